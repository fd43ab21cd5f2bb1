use crate::engine::{self, Candidate, PassMetrics, RunResult};
use crate::error::{Error, Result};
use crate::registry::RuleRegistry;
use crate::{Dimension, Hint, Locale, ResolvedValue, Stash, TokenKind};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// Parsing context.
///
/// Holds what is needed to resolve relative expressions (like 明天): the
/// reference instant, with its UTC offset, and the locale whose rules run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub reference: DateTime<FixedOffset>,
    pub locale: Locale,
}

impl Context {
    pub fn new(reference: DateTime<FixedOffset>, locale: Locale) -> Self {
        Context { reference, locale }
    }

    /// Build a `zh_CN` context from a wall-clock time at `offset_hours` east of UTC.
    pub fn at(reference: NaiveDateTime, offset_hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(offset_hours * 3600)
            .ok_or_else(|| Error::InvalidReference(format!("offset out of range: {offset_hours}h")))?;
        let reference = offset
            .from_local_datetime(&reference)
            .single()
            .ok_or_else(|| Error::InvalidReference(reference.to_string()))?;
        Ok(Context { reference, locale: Locale::ZhCn })
    }
}

impl Default for Context {
    fn default() -> Self {
        if cfg!(test) {
            let offset = FixedOffset::east_opt(8 * 3600).unwrap();
            Self { reference: offset.with_ymd_and_hms(2013, 2, 12, 4, 30, 0).unwrap(), locale: Locale::ZhCn }
        } else {
            Self { reference: Local::now().fixed_offset(), locale: Locale::ZhCn }
        }
    }
}

/// Options that affect which dimensions run and which results are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Requested dimensions; empty means every registered dimension.
    pub dimensions: BTreeSet<Dimension>,
    /// Keep latent (low-confidence) results such as a bare `2016`.
    pub include_latent: bool,
}

impl Options {
    /// Every dimension, latent results dropped.
    pub fn all() -> Self {
        Options::default()
    }

    pub fn only(dimensions: impl IntoIterator<Item = Dimension>) -> Self {
        Options { dimensions: dimensions.into_iter().collect(), include_latent: false }
    }

    /// Look dimensions up by name (`"time"`, `"phone-number"`, aliases included).
    pub fn from_names(names: &[&str]) -> Result<Self> {
        let dimensions = names.iter().map(|name| name.parse::<Dimension>()).collect::<Result<_>>()?;
        Ok(Options { dimensions, include_latent: false })
    }

    pub fn with_latent(mut self, include_latent: bool) -> Self {
        self.include_latent = include_latent;
        self
    }
}

/// Half-open span in character (code point) offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A resolved entity found in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub span: Span,
    /// Slice of the original input that matched.
    pub text: String,
    pub dim: Dimension,
    pub value: ResolvedValue,
    pub latent: bool,
    /// Name of the rule that produced the winning node.
    pub rule: String,
    pub hint: Hint,
}

/// A compact per-pass saturation trace.
#[derive(Debug, Clone)]
pub struct SaturationPass {
    pub pass: usize,
    pub duration: Duration,
    pub produced: usize,
    pub rules_considered: usize,
    /// Rules whose first pattern item matched somewhere.
    pub rules_seeded: usize,
    pub samples: Vec<NodeSummary>,
}

/// A compact node summary used in verbose traces.
#[derive(Debug, Clone)]
pub struct NodeSummary {
    pub span: Span,
    pub rule: String,
    pub preview: String,
}

/// Additional details returned by [`analyze_verbose`].
///
/// This is intentionally compact: it's meant for debugging and performance
/// inspection without dumping the entire internal state.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeDetails {
    pub total: Duration,
    /// Time spent in saturation (rule application) + per-pass trace.
    pub saturation_total: Duration,
    pub saturation: Vec<SaturationPass>,
    /// Time spent resolving and ranking candidates.
    pub resolve: Duration,
    /// Names of rules that were active for this input.
    pub active_rules: Vec<String>,
    /// All eligible resolved candidates before ranking.
    pub all_candidates: Vec<Answer>,
}

/// Result from [`analyze_verbose`].
#[derive(Debug, Clone)]
pub struct VerboseAnalysis {
    pub answers: Vec<Answer>,
    pub details: AnalyzeDetails,
}

/// Analyze `text` with the process-wide registry for `context.locale`.
///
/// ```
/// use mingri::{Context, Dimension, Options, analyze};
///
/// let answers = analyze("三个半小时", &Context::default(), &Options::only([Dimension::Duration])).unwrap();
/// assert_eq!(answers.len(), 1);
/// assert_eq!(answers[0].text, "三个半小时");
/// ```
pub fn analyze(text: &str, context: &Context, options: &Options) -> Result<Vec<Answer>> {
    analyze_with(RuleRegistry::for_locale(context.locale), text, context, options)
}

/// Analyze `text` against an explicit `registry`.
pub fn analyze_with(registry: &RuleRegistry, text: &str, context: &Context, options: &Options) -> Result<Vec<Answer>> {
    let Some(run) = run(registry, text, context, options)? else {
        return Ok(Vec::new());
    };
    Ok(run.answers.iter().map(|c| to_answer(text, &run.stash, c)).collect())
}

/// Like [`analyze`], but also returns saturation traces, the active rules and
/// every candidate considered by the ranker.
pub fn analyze_verbose(text: &str, context: &Context, options: &Options) -> Result<VerboseAnalysis> {
    let registry = RuleRegistry::for_locale(context.locale);
    let Some(run) = run(registry, text, context, options)? else {
        return Ok(VerboseAnalysis { answers: Vec::new(), details: AnalyzeDetails::default() });
    };

    let answers = run.answers.iter().map(|c| to_answer(text, &run.stash, c)).collect();
    let all_candidates = run.candidates.iter().map(|c| to_answer(text, &run.stash, c)).collect();

    let sat = &run.metrics.saturation;
    let saturation = std::iter::once(&sat.initial_regex)
        .chain(sat.iterations.iter())
        .enumerate()
        .map(|(pass, metrics)| pass_summary(text, &run.stash, pass, metrics))
        .collect();

    let details = AnalyzeDetails {
        total: run.metrics.total,
        saturation_total: sat.total,
        saturation,
        resolve: run.metrics.resolve,
        active_rules: run.active_rules.iter().map(|s| s.to_string()).collect(),
        all_candidates,
    };

    Ok(VerboseAnalysis { answers, details })
}

/// Validate the request and run the engine. `None` means there is nothing to
/// parse (blank input).
fn run(registry: &RuleRegistry, text: &str, context: &Context, options: &Options) -> Result<Option<RunResult>> {
    if registry.is_empty() {
        return Err(Error::EmptyRegistry);
    }
    if registry.locale() != context.locale {
        return Err(Error::UnsupportedLocale(context.locale.to_string()));
    }

    let registered = registry.dimensions();
    let requested = if options.dimensions.is_empty() { registered.clone() } else { options.dimensions.clone() };
    if let Some(&missing) = requested.iter().find(|dim| !registered.contains(dim)) {
        return Err(Error::DimensionNotRegistered(missing));
    }

    if text.trim().is_empty() {
        return Ok(None);
    }

    let scheduled = registry.schedule(&requested);
    let effective = Options { dimensions: requested, include_latent: options.include_latent };
    let parser = engine::Parser::new(text, registry, &scheduled);
    Ok(Some(parser.run_with_metrics(context, &effective)))
}

fn char_span(text: &str, start: usize, end: usize) -> Span {
    let start_chars = text[..start].chars().count();
    Span { start: start_chars, end: start_chars + text[start..end].chars().count() }
}

fn to_answer(text: &str, stash: &Stash, candidate: &Candidate) -> Answer {
    let node = stash.get(candidate.node);
    let range = node.range;
    Answer {
        span: char_span(text, range.start, range.end),
        text: text[range.start..range.end].to_string(),
        // Candidates only come from typed nodes.
        dim: node.token.dim().unwrap_or(Dimension::Numeral),
        value: candidate.value.clone(),
        latent: candidate.latent,
        rule: node.rule_name.to_string(),
        hint: node.hint,
    }
}

fn pass_summary(text: &str, stash: &Stash, pass: usize, metrics: &PassMetrics) -> SaturationPass {
    SaturationPass {
        pass,
        duration: metrics.duration,
        produced: metrics.produced,
        rules_considered: metrics.rules_considered,
        rules_seeded: metrics.rules_seeded,
        samples: metrics.nodes.iter().take(8).map(|&id| node_to_summary(text, stash, id)).collect(),
    }
}

fn node_to_summary(text: &str, stash: &Stash, id: crate::NodeId) -> NodeSummary {
    let node = stash.get(id);
    NodeSummary {
        span: char_span(text, node.range.start, node.range.end),
        rule: node.rule_name.to_string(),
        preview: format_token_preview(&node.token.kind),
    }
}

fn format_token_preview(kind: &TokenKind) -> String {
    let s = match kind {
        TokenKind::Numeral(n) => format!("({})", n.value),
        TokenKind::Ordinal(o) => format!("#{}", o.value),
        TokenKind::Time(t) => format!("{:?}", t.expr),
        TokenKind::Duration(d) => format!("{} {}", d.value, d.grain.name()),
        TokenKind::Currency(c) => format!("{} {}", c.value, c.unit),
        TokenKind::Quantity(q) => format!("{} {}", q.value, q.unit),
        TokenKind::Temperature(t) => format!("{}{}", t.value, t.unit),
        TokenKind::PhoneNumber(p) => p.digits.clone(),
        TokenKind::Repeat(r) => format!("every {} {}", r.every.value, r.every.grain.name()),
        TokenKind::Age(a) => format!("{}y", a.value),
        TokenKind::Velocity(v) => format!("{} {}", v.value, v.unit),
        TokenKind::DigitSequence(d) => d.digits.clone(),
        TokenKind::RegexMatch(groups) => groups.first().cloned().unwrap_or_default(),
    };
    s.chars().take(80).collect()
}
