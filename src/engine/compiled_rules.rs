//! Rule compilation and indexing.
//!
//! This module holds the *static* side of the engine: the structures derived from
//! the full rule list when a [`RuleRegistry`](crate::RuleRegistry) is built, so
//! that a parse run only has to pick rows out of prepared indexes.
//!
//! Parsing is split into two phases:
//!
//! 1. **Compile/index rules** (this module, once per registry): record each
//!    rule's owning dimension and coarse metadata, and bucket the rule ids.
//! 2. **Run** (see `parser.rs`, once per input): scan the input for coarse
//!    triggers (`trigger.rs`), select a subset of rules, then saturate.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into the registry's rule vector and into
//!   `CompiledRules::metas`. Those vectors must stay aligned.
//! - `RuleIndex::by_bucket` uses fixed indices (`BUCKET_*`) to avoid `HashMap`
//!   overhead in the hot path.

use crate::{Dimension, Rule};

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BucketMask: u32 {
        /// ASCII or full-width digits.
        const HAS_DIGITS   = 1 << 0;
        /// Chinese numeral characters (一二三, 十百千万, 壹贰叁).
        const HAS_HAN_NUM  = 1 << 1;
        const HAS_COLON    = 1 << 2;
        /// Calendar/clock units: 年 月 日 号 点 时 分 秒 周 星期 …
        const TIME_UNIT    = 1 << 3;
        /// Money markers: 元 块 角 ¥ $ …
        const MONEY        = 1 << 4;
        /// Measure units: 克 斤 米 升 度 ℃ …
        const MEASURE      = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Tracks which dimensions are present in the stash.
    ///
    /// This is used by the parser to skip rules that depend on dimensions that
    /// cannot possibly match yet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DimensionSet: u16 {
        const TIME        = 1 << 0;
        const DURATION    = 1 << 1;
        const CURRENCY    = 1 << 2;
        const QUANTITY    = 1 << 3;
        const TEMPERATURE = 1 << 4;
        const PHONE       = 1 << 5;
        const ORDINAL     = 1 << 6;
        const NUMERAL     = 1 << 7;
        const REPEAT      = 1 << 8;
        const VELOCITY    = 1 << 9;
        const AGE         = 1 << 10;
        const DIGITS      = 1 << 11;
    }
}

impl DimensionSet {
    pub fn of(dim: Dimension) -> Self {
        match dim {
            Dimension::Time => DimensionSet::TIME,
            Dimension::Duration => DimensionSet::DURATION,
            Dimension::Currency => DimensionSet::CURRENCY,
            Dimension::Quantity => DimensionSet::QUANTITY,
            Dimension::Temperature => DimensionSet::TEMPERATURE,
            Dimension::PhoneNumber => DimensionSet::PHONE,
            Dimension::Repeat => DimensionSet::REPEAT,
            Dimension::Velocity => DimensionSet::VELOCITY,
            Dimension::Age => DimensionSet::AGE,
            Dimension::DigitSequence => DimensionSet::DIGITS,
            Dimension::Ordinal => DimensionSet::ORDINAL,
            Dimension::Numeral => DimensionSet::NUMERAL,
        }
    }
}

/// Metadata attached to a rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleMeta {
    /// Dimension whose catalog the rule belongs to.
    pub dim: Dimension,
    pub required_phrases: &'static [&'static str],
    pub optional_phrases: &'static [&'static str],
    pub buckets: BucketMask,
}

#[derive(Default, Debug)]
pub struct RuleIndex {
    pub always_on: Vec<RuleId>,
    pub by_bucket: [Vec<RuleId>; BUCKET_COUNT],
}

pub const BUCKET_COUNT: usize = 6;
pub const BUCKET_HAS_DIGITS: usize = 0;
pub const BUCKET_HAS_HAN_NUM: usize = 1;
pub const BUCKET_HAS_COLON: usize = 2;
pub const BUCKET_TIME_UNIT: usize = 3;
pub const BUCKET_MONEY: usize = 4;
pub const BUCKET_MEASURE: usize = 5;

const BUCKETS: [(BucketMask, usize); BUCKET_COUNT] = [
    (BucketMask::HAS_DIGITS, BUCKET_HAS_DIGITS),
    (BucketMask::HAS_HAN_NUM, BUCKET_HAS_HAN_NUM),
    (BucketMask::HAS_COLON, BUCKET_HAS_COLON),
    (BucketMask::TIME_UNIT, BUCKET_TIME_UNIT),
    (BucketMask::MONEY, BUCKET_MONEY),
    (BucketMask::MEASURE, BUCKET_MEASURE),
];

/// Metadata and indexes for a registry's rules.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub metas: Vec<RuleMeta>,
    pub index: RuleIndex,
}

impl CompiledRules {
    /// Index `rules`, where `owners[i]` is the dimension of `rules[i]`.
    ///
    /// A rule listing several buckets is indexed under each of them and is
    /// activated when *any* of them is present in the input.
    pub fn new(rules: &[Rule], owners: &[Dimension]) -> Self {
        debug_assert_eq!(rules.len(), owners.len());

        let metas: Vec<RuleMeta> = rules
            .iter()
            .zip(owners)
            .map(|(r, &dim)| RuleMeta {
                dim,
                required_phrases: r.required_phrases,
                optional_phrases: r.optional_phrases,
                buckets: BucketMask::from_bits_truncate(r.buckets),
            })
            .collect();

        let mut index = RuleIndex::default();
        for (id, meta) in metas.iter().enumerate() {
            if meta.buckets.is_empty() {
                // No bucket requirements -> always on (phrase filtering will happen later)
                index.always_on.push(id);
                continue;
            }
            for (mask, slot) in BUCKETS {
                if meta.buckets.contains(mask) {
                    index.by_bucket[slot].push(id);
                }
            }
        }

        CompiledRules { metas, index }
    }

    /// Rule ids whose bucket requirements are satisfied by `present`.
    pub fn ids_for_buckets(&self, present: BucketMask) -> Vec<RuleId> {
        let mut ids = self.index.always_on.clone();
        for (mask, slot) in BUCKETS {
            if present.contains(mask) {
                ids.extend(&self.index.by_bucket[slot]);
            }
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
