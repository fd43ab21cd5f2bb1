//! Trigger scanning (input pre-classification).
//!
//! This module inspects the raw input string and produces coarse signals that
//! let the parser quickly decide which rules should be considered.
//!
//! - **Buckets** (`BucketMask`): cheap character-class checks such as
//!   "contains digits" or "contains a calendar unit". These enable bucketed
//!   rules via `RuleIndex::by_bucket`.
//! - **Phrases**: Chinese has no whitespace tokenization to lean on, so phrase
//!   gating is a plain substring test against the (lowercased) input.
//!
//! This is a *heuristic* scan. False positives are acceptable because the
//! downstream parser still has to match full rule patterns; false negatives
//! are not, since they silently disable rules.

use super::compiled_rules::BucketMask;

const HAN_NUMERALS: &str = "零〇一二两三四五六七八九十百千万亿壹贰叁肆伍陆柒捌玖拾佰仟";
const TIME_UNITS: &str = "年月日号號点點时時分秒周星期礼拜天刻季钟鐘";
const MONEY_MARKERS: &str = "元块塊角毛币幣镑¥￥$€£";
const MONEY_WORDS: &[&str] = &["usd", "rmb", "cny", "eur", "gbp", "jpy", "hkd"];
const MEASURE_MARKERS: &str = "克斤吨噸米升度℃℉°亩里寸尺";

/// Input characteristics detected from the raw input.
#[derive(Debug, Clone)]
pub struct TriggerInfo {
    pub buckets: BucketMask,
    lower: String,
}

impl TriggerInfo {
    /// Scan `input` for coarse buckets.
    pub fn scan(input: &str) -> Self {
        let mut buckets = BucketMask::empty();
        let lower = input.to_lowercase();

        for c in input.chars() {
            if c.is_ascii_digit() || ('０'..='９').contains(&c) {
                buckets |= BucketMask::HAS_DIGITS;
            }
            if HAN_NUMERALS.contains(c) {
                buckets |= BucketMask::HAS_HAN_NUM;
            }
            if c == ':' || c == '：' {
                buckets |= BucketMask::HAS_COLON;
            }
            if TIME_UNITS.contains(c) {
                buckets |= BucketMask::TIME_UNIT;
            }
            if MONEY_MARKERS.contains(c) {
                buckets |= BucketMask::MONEY;
            }
            if MEASURE_MARKERS.contains(c) {
                buckets |= BucketMask::MEASURE;
            }
        }

        if MONEY_WORDS.iter().any(|w| lower.contains(w)) || lower.contains("美金") || lower.contains("美元") {
            buckets |= BucketMask::MONEY;
        }

        TriggerInfo { buckets, lower }
    }

    /// True when `phrase` occurs somewhere in the input.
    pub fn has_phrase(&self, phrase: &str) -> bool {
        self.lower.contains(phrase)
    }
}
