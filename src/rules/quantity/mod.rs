//! Measured quantities: 5公斤, 三斤半, 100米, 500ml.

use crate::engine::BucketMask;
use crate::rules::numeral::predicates::is_positive;
use crate::rules::{numeral_value, regex_group};
use crate::{Context, Dimension, Hint, Options, QuantityData, ResolvedValue, Rule, Token, TokenKind};

/// Normalized unit and measure for a unit word.
fn unit_info(unit: &str) -> Option<(&'static str, &'static str)> {
    let info = match unit {
        "毫克" | "mg" => ("mg", "mass"),
        "克" | "g" => ("g", "mass"),
        "千克" | "公斤" | "kg" => ("kg", "mass"),
        "斤" => ("jin", "mass"),
        "吨" | "噸" => ("t", "mass"),
        "毫米" | "mm" => ("mm", "length"),
        "厘米" | "cm" => ("cm", "length"),
        "米" | "m" => ("m", "length"),
        "公里" | "千米" | "km" => ("km", "length"),
        "英里" => ("mile", "length"),
        "毫升" | "ml" => ("ml", "volume"),
        "升" | "l" => ("l", "volume"),
        "平方米" | "平米" | "㎡" => ("m2", "area"),
        "平方公里" | "平方千米" => ("km2", "area"),
        "亩" | "畝" => ("mu", "area"),
        _ => return None,
    };
    Some(info)
}

fn is_quantity(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Quantity(_))
}

/// Latin units are not buckets, so this rule stays always on.
fn rule_numeral_unit() -> Rule {
    rule! {
        name: "<number> <unit>",
        pattern: [
            pred!(is_positive),
            re!(r"(?i)(平方公里|平方千米|平方米|平米|㎡|千克|公斤|毫克|克|斤|吨|噸|毫米|厘米|公里|千米|英里|米|毫升|升|亩|畝|(?:kg|mg|km|cm|mm|ml|g|m|l)(?-u:\b))")
        ],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<QuantityData> {
            let (unit, measure) = unit_info(regex_group(&tokens[1], 1)?)?;
            Some(QuantityData { value: numeral_value(&tokens[0])?, unit, measure })
        },
    }
}

/// 三斤半, 两公里半.
fn rule_and_half() -> Rule {
    rule! {
        name: "<quantity> 半",
        pattern: [
            pred!(is_quantity),
            re!(r"半")
        ],
        required_phrases: ["半"],
        buckets: BucketMask::MEASURE.bits(),
        deps: [Dimension::Quantity],
        prod: |tokens: &[Token]| -> Option<QuantityData> {
            match &tokens[0].kind {
                TokenKind::Quantity(qd) if qd.value.fract().abs() < f64::EPSILON => {
                    Some(QuantityData { value: qd.value + 0.5, ..qd.clone() })
                }
                _ => None,
            }
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_numeral_unit(), rule_and_half()]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::Quantity(qd) => Some((
            ResolvedValue::Quantity { value: qd.value, unit: qd.unit.to_string(), measure: qd.measure.to_string() },
            false,
        )),
        _ => None,
    }
}
