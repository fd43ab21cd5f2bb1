//! Matching and saturation parser (the chart builder).
//!
//! This module is the operational core of the engine:
//!
//! - Select a subset of rules that are plausible for the input (dimension
//!   scheduling, bucket and phrase gating; see `compiled_rules.rs` and
//!   `trigger.rs`).
//! - Repeatedly apply those rules to build up a `Stash` of `Node`s.
//! - Deduplicate produced nodes to keep saturation finite and deterministic
//!   (see `dedup.rs`).
//! - Hand the saturated chart to `resolve.rs` and `rank.rs`.
//!
//! ## Key concepts
//!
//! - **Rule** (`crate::Rule`): a sequence of `Pattern`s with a production.
//! - **Node** (`crate::Node`): a produced token with a span (`Range`), a hint
//!   and the ids of the nodes it was built from.
//! - **Stash** (`crate::Stash`): the arena of discovered nodes. Raw regex
//!   matches are interned as leaves only when a node that uses them is kept.
//! - **Saturation**: repeatedly apply rules until an iteration produces no new
//!   nodes (a fixpoint).
//!
//! ## Pass structure
//!
//! ```text
//! (0) trigger scan         -> buckets + phrase lookups
//! (1) initial regex pass   -> seed from raw input
//! (2) iterative passes     -> mix regex + predicate rules as stash grows
//! (3) resolve + rank       -> Candidate output
//! ```
//!
//! Adjacent pattern items may be separated by whitespace; nothing else is
//! skipped. The output is deterministic given the same input, registry,
//! context and options.

use super::dedup::NodeKey;
use super::metrics::{PassMetrics, RunMetrics, RunResult, SaturationMetrics};
use super::trigger::TriggerInfo;
use super::{DimensionSet, rank, resolve};
use crate::registry::RuleRegistry;
use crate::{Context, Dimension, Node, NodeId, Options, Pattern, Range, Rule, Stash, Token, TokenKind};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Upper bound on saturation iterations. Every rule in the catalog grows its
/// span, so real inputs reach the fixpoint long before this.
const MAX_ITERATIONS: usize = 64;

/// One consumed pattern item.
#[derive(Debug, Clone)]
enum RouteItem {
    /// A raw regex match with its (lowercased) capture groups.
    Leaf(Vec<String>),
    /// A node already in the stash.
    Node(NodeId),
}

#[derive(Debug, Clone)]
struct Step {
    range: Range,
    item: RouteItem,
}

/// Internal helper representing a partially matched rule as the engine
/// advances through the pattern.
///
/// ```text
/// pattern: [Predicate(is_numeral), Regex("个?半小时")]
///           ^ consumed             ^ next_idx
///
/// route: [ Node #4 (0..3) ]
/// position points to the end of the last consumed item (here: 3)
/// ```
struct PartialMatch<'a> {
    rule: &'a Rule,
    next_idx: usize,
    position: usize,
    route: Vec<Step>,
}

/// A completed match whose production returned a token.
struct Produced<'a> {
    rule: &'a Rule,
    range: Range,
    token: Token,
    route: Vec<Step>,
}

/// Parser orchestrates applying `Rule`s against an input string.
///
/// ```text
/// new() -> saturate() -> resolve_stash() -> rank::candidates() -> rank::select()
/// ```
#[derive(Debug)]
pub(crate) struct Parser<'a> {
    input: &'a str,
    stash: Stash,
    /// Keys of every produced node, used to avoid re-adding identical nodes.
    seen: HashSet<NodeKey>,
    dims_in_stash: DimensionSet,
    /// Active rules that start with a `Regex` pattern.
    regex_rules: Vec<&'a Rule>,
    /// Active rules that start with a `Predicate` pattern.
    predicate_rules: Vec<&'a Rule>,
}

impl<'a> Parser<'a> {
    /// Create a parser for `input` that runs only rules owned by `scheduled`
    /// dimensions and allowed by the input's trigger scan.
    pub fn new(input: &'a str, registry: &'a RuleRegistry, scheduled: &BTreeSet<Dimension>) -> Self {
        let trigger_info = TriggerInfo::scan(input);
        debug!(buckets = ?trigger_info.buckets, "trigger scan");

        let compiled = registry.compiled();
        let rules = registry.rules();

        let mut phrase_filtered = 0;
        let active: Vec<usize> = compiled
            .ids_for_buckets(trigger_info.buckets)
            .into_iter()
            .filter(|&id| scheduled.contains(&compiled.metas[id].dim))
            .filter(|&id| {
                let meta = &compiled.metas[id];
                // required_phrases: all must be present; optional_phrases: any one.
                let ok = meta.required_phrases.iter().all(|p| trigger_info.has_phrase(p))
                    && (meta.optional_phrases.is_empty()
                        || meta.optional_phrases.iter().any(|p| trigger_info.has_phrase(p)));
                if !ok {
                    phrase_filtered += 1;
                }
                ok
            })
            .collect();

        debug!(active = active.len(), total = rules.len(), phrase_filtered, "active rules");

        let mut regex_rules = Vec::new();
        let mut predicate_rules = Vec::new();
        for id in active {
            let rule = &rules[id];
            match rule.pattern.first() {
                Some(Pattern::Regex(_)) => regex_rules.push(rule),
                Some(Pattern::Predicate(_)) => predicate_rules.push(rule),
                None => {}
            }
        }

        Parser {
            input,
            stash: Stash::empty(),
            seen: HashSet::new(),
            dims_in_stash: DimensionSet::empty(),
            regex_rules,
            predicate_rules,
        }
    }

    pub fn active_rule_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.regex_rules.iter().chain(self.predicate_rules.iter()).map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// First non-whitespace byte offset at or after `position`.
    fn skip_whitespace(&self, position: usize) -> usize {
        let rest = &self.input[position..];
        position + (rest.len() - rest.trim_start().len())
    }

    fn regex_step(re: &Regex, caps: &regex::Captures<'_>) -> Option<Step> {
        let m = caps.get(0)?;
        if m.start() == m.end() {
            return None;
        }
        let groups: Vec<String> = (0..re.captures_len())
            .map(|i| caps.get(i).map(|g| g.as_str().to_lowercase()).unwrap_or_default())
            .collect();
        Some(Step { range: Range { start: m.start(), end: m.end() }, item: RouteItem::Leaf(groups) })
    }

    /// Find items that match `pat` and start exactly at `position` (after
    /// optional whitespace).
    fn lookup_item(&self, pat: &Pattern, position: usize) -> Vec<Step> {
        let position = self.skip_whitespace(position);
        match pat {
            Pattern::Regex(re) => re
                .captures_at(self.input, position)
                .filter(|caps| caps.get(0).is_some_and(|m| m.start() == position))
                .and_then(|caps| Self::regex_step(re, &caps))
                .into_iter()
                .collect(),
            Pattern::Predicate(pred) => self
                .stash
                .starting_at(position)
                .iter()
                .copied()
                .filter(|&id| pred(&self.stash.get(id).token))
                .map(|id| Step { range: self.stash.get(id).range, item: RouteItem::Node(id) })
                .collect(),
        }
    }

    /// Find items that match `pat` anywhere in the input.
    fn lookup_item_anywhere(&self, pat: &Pattern) -> Vec<Step> {
        match pat {
            Pattern::Regex(re) => re.captures_iter(self.input).filter_map(|caps| Self::regex_step(re, &caps)).collect(),
            Pattern::Predicate(pred) => self
                .stash
                .produced()
                .filter(|(_, node)| pred(&node.token))
                .map(|(id, node)| Step { range: node.range, item: RouteItem::Node(id) })
                .collect(),
        }
    }

    fn seed_first_pattern_anywhere(&self, rule: &'a Rule) -> Vec<PartialMatch<'a>> {
        let Some(first) = rule.pattern.first() else {
            return Vec::new();
        };
        self.lookup_item_anywhere(first)
            .into_iter()
            .map(|step| PartialMatch { rule, next_idx: 1, position: step.range.end, route: vec![step] })
            .collect()
    }

    /// Depth-first expansion of `PartialMatch` objects until the entire rule is
    /// satisfied.
    ///
    /// ```text
    /// [m0] --Regex--> [m1] --Predicate--> [m2]
    ///   │                           │
    ///   └─ (backtracks)             └─ success -> collected
    /// ```
    fn match_all(&self, input_matches: Vec<PartialMatch<'a>>) -> Vec<PartialMatch<'a>> {
        let mut results = Vec::new();
        let mut stack: Vec<PartialMatch<'a>> = input_matches;
        stack.reverse();

        while let Some(m) = stack.pop() {
            if m.next_idx >= m.rule.pattern.len() {
                results.push(m);
                continue;
            }

            let pat = &m.rule.pattern[m.next_idx];
            let steps = self.lookup_item(pat, m.position);

            // Push in reverse order so we explore them in forward order (stack is LIFO)
            for step in steps.into_iter().rev() {
                let mut route = m.route.clone();
                let position = step.range.end;
                route.push(step);
                stack.push(PartialMatch { rule: m.rule, next_idx: m.next_idx + 1, position, route });
            }
        }

        results
    }

    fn route_token(&self, step: &Step) -> Token {
        match &step.item {
            RouteItem::Leaf(groups) => Token { kind: TokenKind::RegexMatch(groups.clone()) },
            RouteItem::Node(id) => self.stash.get(*id).token.clone(),
        }
    }

    /// Invoke the rule's production on a completed match.
    ///
    /// A production that panics is logged and treated as a non-match.
    fn produce(&self, m: PartialMatch<'a>) -> Option<Produced<'a>> {
        let (first, last) = (m.route.first()?, m.route.last()?);
        let range = Range { start: first.range.start, end: last.range.end };
        let tokens: Vec<Token> = m.route.iter().map(|step| self.route_token(step)).collect();

        let outcome = catch_unwind(AssertUnwindSafe(|| (m.rule.production)(&tokens)));
        let token = match outcome {
            Ok(Some(token)) if token.dim().is_some() => token,
            Ok(_) => {
                trace!(rule = m.rule.name, span = ?range, "production returned nothing");
                return None;
            }
            Err(_) => {
                warn!(rule = m.rule.name, span = ?range, "rule production panicked; treating as no match");
                return None;
            }
        };

        trace!(rule = m.rule.name, span = ?range, text = &self.input[range.start..range.end], token = ?token, "production ok");
        Some(Produced { rule: m.rule, range, token, route: m.route })
    }

    /// Apply an ordered set of rules once and return the matches produced.
    fn apply_rules_once(&self, rule_set: &[&'a Rule]) -> (Vec<Produced<'a>>, usize) {
        let mut discovered = Vec::new();
        let mut rules_seeded = 0;

        for rule in rule_set {
            let starts = self.seed_first_pattern_anywhere(rule);
            if starts.is_empty() {
                continue;
            }
            rules_seeded += 1;
            trace!(rule = rule.name, seeds = starts.len(), "rule seeded");

            for m in self.match_all(starts) {
                if let Some(produced) = self.produce(m) {
                    discovered.push(produced);
                }
            }
        }
        (discovered, rules_seeded)
    }

    /// Add new matches to the stash and return the ids actually inserted.
    fn commit(&mut self, discovered: Vec<Produced<'a>>) -> Vec<NodeId> {
        let mut added = Vec::new();
        for p in discovered {
            let mut node =
                Node { range: p.range, token: p.token, rule_name: p.rule.name, hint: p.rule.hint, children: Vec::new() };
            if !self.seen.insert(NodeKey::from_node(&node)) {
                continue;
            }
            node.children = p
                .route
                .into_iter()
                .map(|step| match step.item {
                    RouteItem::Leaf(groups) => self.stash.intern_leaf(step.range, groups),
                    RouteItem::Node(id) => id,
                })
                .collect();
            if let Some(dim) = node.token.dim() {
                self.dims_in_stash |= DimensionSet::of(dim);
            }
            added.push(self.stash.insert(node));
        }
        added
    }

    /// Check if all required dimensions for a rule are present in the stash.
    fn deps_satisfied(rule: &Rule, dims_in_stash: DimensionSet) -> bool {
        rule.deps.iter().all(|&dep| dims_in_stash.contains(DimensionSet::of(dep)))
    }

    /// Saturate the stash by repeatedly applying rules until a fixpoint.
    ///
    /// ```text
    /// regex_rules pass
    ///      │
    ///      ▼
    ///  stash grows ──┐
    ///                │ predicate + regex passes
    ///                └── repeat until fixed point
    /// ```
    fn saturate(&mut self) -> SaturationMetrics {
        let mut metrics = SaturationMetrics::default();
        let saturation_start = Instant::now();

        let regex_start = Instant::now();
        let regex_rules = self.regex_rules.clone();
        let (discovered, rules_seeded) = self.apply_rules_once(&regex_rules);
        let added = self.commit(discovered);
        debug!(produced = added.len(), "initial regex pass");
        metrics.initial_regex = PassMetrics {
            duration: regex_start.elapsed(),
            produced: added.len(),
            nodes: added,
            rules_considered: regex_rules.len(),
            rules_seeded,
        };
        if self.stash.null() {
            metrics.total = saturation_start.elapsed();
            return metrics;
        }

        let all_rules: Vec<&'a Rule> = self.predicate_rules.iter().chain(self.regex_rules.iter()).copied().collect();

        for iteration in 1.. {
            if iteration > MAX_ITERATIONS {
                warn!(iterations = MAX_ITERATIONS, "saturation did not reach a fixpoint; stopping");
                break;
            }
            let iteration_start = Instant::now();
            let dims_in_stash = self.dims_in_stash;
            let rules: Vec<&'a Rule> =
                all_rules.iter().copied().filter(|rule| Self::deps_satisfied(rule, dims_in_stash)).collect();

            let (discovered, rules_seeded) = self.apply_rules_once(&rules);
            let added = self.commit(discovered);
            debug!(iteration, produced = added.len(), "saturation pass");

            let done = added.is_empty();
            metrics.iterations.push(PassMetrics {
                duration: iteration_start.elapsed(),
                produced: added.len(),
                nodes: added,
                rules_considered: rules.len(),
                rules_seeded,
            });
            if done {
                break;
            }
        }

        metrics.total = saturation_start.elapsed();
        debug!(nodes = self.stash.produced_len(), elapsed = ?metrics.total, "saturated");
        metrics
    }

    /// Saturate, resolve every node bottom-up, and rank the candidates.
    ///
    /// `options.dimensions` must already be the effective (non-empty) set of
    /// requested dimensions.
    pub fn run_with_metrics(mut self, context: &Context, options: &Options) -> RunResult {
        let total_start = Instant::now();
        let active_rules = self.active_rule_names();
        let saturation = self.saturate();

        let resolve_start = Instant::now();
        let resolutions = resolve::resolve_stash(&self.stash, context, options);
        let candidates = rank::candidates(&self.stash, &resolutions, options);
        let answers = rank::select(self.input, &self.stash, &candidates);
        let resolve = resolve_start.elapsed();

        RunResult {
            stash: self.stash,
            candidates,
            answers,
            active_rules,
            metrics: RunMetrics { total: total_start.elapsed(), saturation, resolve },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hint, NumeralData, time_expr::TimeData, time_expr::TimeExpr};

    fn is_numeral(token: &Token) -> bool {
        matches!(token.kind, TokenKind::Numeral(_))
    }

    fn test_registry() -> RuleRegistry {
        let numerals = vec![rule! {
            name: "digit",
            pattern: [re!(r"\d")],
            prod: |tokens: &[Token]| -> Option<NumeralData> {
                let v: f64 = crate::rules::regex_group(tokens.first()?, 0)?.parse().ok()?;
                Some(NumeralData { value: v, grain: None, multipliable: false })
            },
        }];
        let time = vec![
            rule! {
                name: "<numeral> 点",
                pattern: [pred!(is_numeral), re!(r"点")],
                hint: Hint::NoHint,
                prod: |tokens: &[Token]| -> Option<TimeData> {
                    let TokenKind::Numeral(n) = &tokens.first()?.kind else { return None };
                    let hour = n.value as u32;
                    Some(TimeData::new(TimeExpr::TimeOfDay { hour, minute: None, second: None, ambiguous: true }))
                },
            },
            rule! {
                name: "panics",
                pattern: [re!(r"炸")],
                prod: |_tokens: &[Token]| -> Option<Token> { panic!("bad rule") },
            },
        ];
        RuleRegistry::from_rules(crate::Locale::ZhCn, vec![(Dimension::Numeral, numerals), (Dimension::Time, time)])
    }

    fn scheduled(dims: &[Dimension]) -> BTreeSet<Dimension> {
        dims.iter().copied().collect()
    }

    #[test]
    fn composition_allows_whitespace_between_items() {
        let registry = test_registry();
        let mut parser = Parser::new("3 点", &registry, &scheduled(&[Dimension::Numeral, Dimension::Time]));
        parser.saturate();
        let times: Vec<_> = parser.stash.produced().filter(|(_, n)| n.token.dim() == Some(Dimension::Time)).collect();
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].1.range, Range { start: 0, end: "3 点".len() });
    }

    #[test]
    fn children_precede_parents_in_arena() {
        let registry = test_registry();
        let mut parser = Parser::new("3点", &registry, &scheduled(&[Dimension::Numeral, Dimension::Time]));
        parser.saturate();
        for (id, node) in parser.stash.nodes() {
            assert!(node.children.iter().all(|&child| child < id), "{node:?}");
        }
    }

    #[test]
    fn unscheduled_dimensions_do_not_run() {
        let registry = test_registry();
        let mut parser = Parser::new("3点", &registry, &scheduled(&[Dimension::Numeral]));
        parser.saturate();
        assert!(parser.stash.produced().all(|(_, n)| n.token.dim() == Some(Dimension::Numeral)));
    }

    #[test]
    fn panicking_production_is_a_non_match() {
        let registry = test_registry();
        let mut parser = Parser::new("炸3点", &registry, &scheduled(&[Dimension::Numeral, Dimension::Time]));
        parser.saturate();
        assert!(parser.stash.produced().all(|(_, n)| n.rule_name != "panics"));
        assert!(parser.stash.produced().any(|(_, n)| n.rule_name == "<numeral> 点"));
    }

    #[test]
    fn saturation_reaches_fixpoint_without_duplicates() {
        let registry = test_registry();
        let mut parser = Parser::new("3点3点", &registry, &scheduled(&[Dimension::Numeral, Dimension::Time]));
        let metrics = parser.saturate();
        assert_eq!(metrics.iterations.last().map(|p| p.produced), Some(0));
        let keys: HashSet<NodeKey> = parser.stash.produced().map(|(_, n)| NodeKey::from_node(n)).collect();
        assert_eq!(keys.len(), parser.stash.produced_len());
    }
}
