//! Temperatures: 三十度, 25℃, 零下五度, 华氏100度.

use crate::engine::BucketMask;
use crate::rules::numeral::predicates::{integer_between, is_numeral};
use crate::rules::{numeral_value, regex_group};
use crate::{Context, Dimension, Hint, Options, ResolvedValue, Rule, TemperatureData, Token, TokenKind};

const MEASURE: u32 = BucketMask::MEASURE.bits();

fn unit_name(unit: &str) -> Option<&'static str> {
    match unit {
        "摄氏度" | "摄氏" | "°c" | "℃" => Some("celsius"),
        "华氏度" | "华氏" | "°f" | "℉" => Some("fahrenheit"),
        "度" | "°" => Some("degree"),
        _ => None,
    }
}

fn temperature_data(t: &Token) -> Option<&TemperatureData> {
    match &t.kind {
        TokenKind::Temperature(td) => Some(td),
        _ => None,
    }
}

/// 三十度, 25℃, 38.5°C.
fn rule_numeral_unit() -> Rule {
    rule! {
        name: "<number> <temperature unit>",
        pattern: [
            pred!(is_numeral),
            re!(r"(?i)(摄氏度|华氏度|°c|°f|℃|℉|°|度)")
        ],
        buckets: MEASURE,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TemperatureData> {
            let unit = unit_name(regex_group(&tokens[1], 1)?)?;
            Some(TemperatureData { value: numeral_value(&tokens[0])?, unit })
        },
    }
}

/// 摄氏20度, 华氏100度.
fn rule_scale_prefix() -> Rule {
    rule! {
        name: "摄氏|华氏 <number> 度",
        pattern: [
            re!(r"(摄氏|华氏)"),
            pred!(is_numeral),
            re!(r"度")
        ],
        optional_phrases: ["摄氏", "华氏"],
        buckets: MEASURE,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TemperatureData> {
            let unit = unit_name(regex_group(&tokens[0], 1)?)?;
            Some(TemperatureData { value: numeral_value(&tokens[1])?, unit })
        },
    }
}

/// 零下五度.
fn rule_below_zero() -> Rule {
    rule! {
        name: "零下 <temperature>",
        pattern: [
            re!(r"零下"),
            pred!(|t: &Token| matches!(&t.kind, TokenKind::Temperature(td) if td.value > 0.0))
        ],
        required_phrases: ["零下"],
        deps: [Dimension::Temperature],
        prod: |tokens: &[Token]| -> Option<TemperatureData> {
            let td = temperature_data(&tokens[1])?;
            Some(TemperatureData { value: -td.value, unit: td.unit })
        },
    }
}

/// 三十八度五: the trailing digit is tenths of a degree.
fn rule_tenths() -> Rule {
    rule! {
        name: "<temperature> <tenths>",
        pattern: [
            pred!(|t: &Token| matches!(&t.kind, TokenKind::Temperature(td) if td.unit == "degree" && td.value.fract() == 0.0)),
            pred!(integer_between::<1, 10>)
        ],
        deps: [Dimension::Temperature],
        prod: |tokens: &[Token]| -> Option<TemperatureData> {
            let td = temperature_data(&tokens[0])?;
            let tenths = numeral_value(&tokens[1])? / 10.0;
            let value = if td.value < 0.0 { td.value - tenths } else { td.value + tenths };
            Some(TemperatureData { value, unit: td.unit })
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_numeral_unit(), rule_scale_prefix(), rule_below_zero(), rule_tenths()]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    let td = temperature_data(token)?;
    Some((ResolvedValue::Temperature { value: td.value, unit: td.unit.to_string() }, false))
}
