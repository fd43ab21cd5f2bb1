//! Rule-based extraction of typed entities from Chinese text.
//!
//! A per-dimension library of production rules is saturated bottom-up over
//! the input, every node of the resulting forest is resolved against a
//! reference instant, and the ranker collapses the overlapping candidates into
//! a minimal, non-overlapping answer set.
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use mingri::{Context, Dimension, Locale, Options, analyze};
//!
//! let offset = FixedOffset::east_opt(8 * 3600).unwrap();
//! let reference = offset.with_ymd_and_hms(2016, 12, 8, 11, 30, 30).unwrap();
//! let context = Context::new(reference, Locale::ZhCn);
//! let answers = analyze("明天下午三点", &context, &Options::only([Dimension::Time])).unwrap();
//! assert_eq!(answers.len(), 1);
//! ```

extern crate self as mingri;

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[macro_use]
mod macros;
mod api;
mod dimension;
mod engine;
mod error;
mod locale;
mod registry;
mod rules;
mod time_expr;
mod value;

pub use api::{
    Answer, AnalyzeDetails, Context, NodeSummary, Options, SaturationPass, Span, VerboseAnalysis, analyze,
    analyze_verbose, analyze_with,
};
pub use dimension::Dimension;
pub use error::{Error, Result};
pub use locale::Locale;
pub use registry::RuleRegistry;
pub use time_expr::{Grain, finer, reset_to};
pub use value::{ResolvedValue, TimeValue};

use crate::time_expr::TimeData;

// --- Hints -------------------------------------------------------------------

/// Disambiguation tag carried by a rule and every node it builds.
///
/// Hints steer ranking and duplicate suppression. The only hint that changes
/// resolution itself is [`Hint::Lunar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    #[default]
    NoHint,
    /// The node is a complete answer and outranks anything it overlaps.
    FinalRule,
    /// Only meaningful as a building block; never emitted on its own.
    ComposeNeeded,
    Intersect,
    Lunar,
    PartOfDayAtLast,
    Holiday,
    /// 今天, 明天, 昨天 and friends.
    RecentNominal,
    /// 最近: recency without an explicit direction.
    UncertainRecent,
    Recent,
    Sequence,
    Season,
    YearOnly,
    MonthOnly,
    DayOnly,
    YearMonth,
    MonthDay,
    Date,
}

impl Hint {
    /// Rank used when two candidates carry the same dimension, span and value.
    pub fn priority(self) -> u8 {
        match self {
            Hint::FinalRule => 9,
            Hint::Intersect => 7,
            Hint::Holiday | Hint::Lunar => 6,
            Hint::Date | Hint::YearMonth | Hint::MonthDay | Hint::Season => 5,
            Hint::Sequence | Hint::RecentNominal => 4,
            Hint::Recent => 3,
            Hint::UncertainRecent | Hint::PartOfDayAtLast => 2,
            Hint::YearOnly | Hint::MonthOnly | Hint::DayOnly => 1,
            Hint::NoHint | Hint::ComposeNeeded => 0,
        }
    }
}

// --- Internal types ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumeralData {
    pub value: f64,
    pub grain: Option<u32>,
    pub multipliable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrdinalData {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DurationData {
    pub value: f64,
    pub grain: Grain,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CurrencyData {
    pub value: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QuantityData {
    pub value: f64,
    pub unit: &'static str,
    pub measure: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TemperatureData {
    pub value: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PhoneData {
    pub digits: String,
}

/// Every `every` (a count of `grain`), optionally pinned to `anchor`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RepeatData {
    pub every: DurationData,
    pub anchor: Option<TimeData>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AgeData {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VelocityData {
    pub value: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DigitSequenceData {
    pub digits: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Numeral(NumeralData),
    Ordinal(OrdinalData),
    Time(TimeData),
    Duration(DurationData),
    Currency(CurrencyData),
    Quantity(QuantityData),
    Temperature(TemperatureData),
    PhoneNumber(PhoneData),
    Repeat(RepeatData),
    Age(AgeData),
    Velocity(VelocityData),
    DigitSequence(DigitSequenceData),
    RegexMatch(Vec<String>),
}

/// Unresolved production payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
}

impl Token {
    /// Dimension of the payload; raw regex matches have none.
    pub fn dim(&self) -> Option<Dimension> {
        match &self.kind {
            TokenKind::Numeral(_) => Some(Dimension::Numeral),
            TokenKind::Ordinal(_) => Some(Dimension::Ordinal),
            TokenKind::Time(_) => Some(Dimension::Time),
            TokenKind::Duration(_) => Some(Dimension::Duration),
            TokenKind::Currency(_) => Some(Dimension::Currency),
            TokenKind::Quantity(_) => Some(Dimension::Quantity),
            TokenKind::Temperature(_) => Some(Dimension::Temperature),
            TokenKind::PhoneNumber(_) => Some(Dimension::PhoneNumber),
            TokenKind::Repeat(_) => Some(Dimension::Repeat),
            TokenKind::Age(_) => Some(Dimension::Age),
            TokenKind::Velocity(_) => Some(Dimension::Velocity),
            TokenKind::DigitSequence(_) => Some(Dimension::DigitSequence),
            TokenKind::RegexMatch(_) => None,
        }
    }
}

// Trait to convert rule production results into tokens
pub(crate) trait IntoToken {
    fn into_token(self) -> Option<Token>;
}

impl IntoToken for Token {
    fn into_token(self) -> Option<Token> {
        Some(self)
    }
}

macro_rules! impl_into_token {
    ($($data:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoToken for $data {
                fn into_token(self) -> Option<Token> {
                    Some(Token { kind: TokenKind::$variant(self) })
                }
            }
        )*
    };
}

impl_into_token! {
    NumeralData => Numeral,
    OrdinalData => Ordinal,
    TimeData => Time,
    DurationData => Duration,
    CurrencyData => Currency,
    QuantityData => Quantity,
    TemperatureData => Temperature,
    PhoneData => PhoneNumber,
    RepeatData => Repeat,
    AgeData => Age,
    VelocityData => Velocity,
    DigitSequenceData => DigitSequence,
}

// Pattern items used by rules: either a Regex to match text, or a Predicate
// that matches an existing token in the stash.
#[derive(Debug)]
pub(crate) enum Pattern {
    /// Match a regular expression against the original input. The `Regex`
    /// is stored as a static reference (created via the `regex!` helper macro
    /// in `src/macros.rs`).
    Regex(&'static Regex),

    /// Match an already-discovered `Token` using a predicate function. This
    /// allows rules to combine previously found tokens (from the `Stash`).
    Predicate(fn(&Token) -> bool),
}

pub(crate) type Production = Box<dyn Fn(&[Token]) -> Option<Token> + Send + Sync>;

/// A parsing rule: a name, a positional `pattern` (vector of `Pattern` items)
/// and a `production` function that receives the matched tokens and
/// optionally returns a new `Token`.
pub(crate) struct Rule {
    pub name: &'static str,
    pub pattern: Vec<Pattern>,
    pub production: Production,
    /// Required phrases - ALL must appear in input for this rule to activate (AND logic).
    pub required_phrases: &'static [&'static str],
    /// Optional phrases - ANY one must appear in input for this rule to activate (OR logic).
    pub optional_phrases: &'static [&'static str],
    /// Bucket mask - rule only activates if input has matching buckets.
    pub buckets: u32,
    /// Required dimensions in stash before this rule activates.
    pub deps: &'static [Dimension],
    /// Ranking hint stamped on every node this rule builds.
    pub hint: Hint,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("production", &"<function>")
            .field("buckets", &self.buckets)
            .field("hint", &self.hint)
            .finish()
    }
}

/// Half-open byte interval into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

impl Range {
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn strictly_contains(&self, other: &Range) -> bool {
        self.contains(other) && self != other
    }
}

/// Index of a node inside a [`Stash`].
pub(crate) type NodeId = usize;

/// A node of the parse forest.
///
/// Children are indices into the owning [`Stash`], so a sub-node shared by
/// several parents is stored once. A child is always inserted before its
/// parent, which makes arena order a valid bottom-up order.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub range: Range,
    pub token: Token,
    /// Name of the rule that produced this node.
    pub rule_name: &'static str,
    pub hint: Hint,
    pub children: Vec<NodeId>,
}

// --- Stash: arena of discovered nodes ----------------------------------------

#[derive(Debug, Default)]
pub(crate) struct Stash {
    nodes: Vec<Node>,
    /// Rule-produced nodes (no raw regex leaves) keyed by start offset.
    by_start: BTreeMap<usize, Vec<NodeId>>,
    produced: Vec<NodeId>,
    leaves: HashMap<(Range, Vec<String>), NodeId>,
}

impl Stash {
    /// Create an empty `Stash`.
    pub fn empty() -> Self {
        Stash::default()
    }

    /// Return true if no rule has produced a node yet.
    pub fn null(&self) -> bool {
        self.produced.is_empty()
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// All nodes in arena (bottom-up) order, regex leaves included.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Rule-produced nodes in discovery order.
    pub fn produced(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.produced.iter().map(|&id| (id, &self.nodes[id]))
    }

    /// Rule-produced nodes that start exactly at `position`.
    pub fn starting_at(&self, position: usize) -> &[NodeId] {
        self.by_start.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn produced_len(&self) -> usize {
        self.produced.len()
    }

    /// Store a raw regex match once and return its id.
    pub fn intern_leaf(&mut self, range: Range, groups: Vec<String>) -> NodeId {
        if let Some(&id) = self.leaves.get(&(range, groups.clone())) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            range,
            token: Token { kind: TokenKind::RegexMatch(groups.clone()) },
            rule_name: "<regex>",
            hint: Hint::NoHint,
            children: Vec::new(),
        });
        self.leaves.insert((range, groups), id);
        id
    }

    /// Insert a rule-produced node.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.by_start.entry(node.range.start).or_default().push(id);
        self.produced.push(id);
        self.nodes.push(node);
        id
    }
}
