//! Speeds: 60公里每小时, 每小时80公里, 时速120公里, 5m/s.

use crate::rules::numeral::predicates::is_positive;
use crate::rules::{numeral_value, regex_group};
use crate::{Context, Dimension, Hint, Options, ResolvedValue, Rule, Token, TokenKind, VelocityData};

fn unit_name(unit: &str) -> Option<&'static str> {
    let name = match unit.to_ascii_lowercase().as_str() {
        "公里每小时" | "公里/小时" | "千米每小时" | "千米/小时" | "公里每小時" | "km/h" | "kph" => "km/h",
        "米每秒" | "米/秒" | "m/s" => "m/s",
        "英里每小时" | "英里/小时" | "mph" => "mph",
        _ => return None,
    };
    Some(name)
}

/// 60公里每小时, 5m/s, 30mph.
fn rule_numeral_unit() -> Rule {
    rule! {
        name: "<number> <speed unit>",
        pattern: [
            pred!(is_positive),
            re!(r"(?i)(公里每小时|公里每小時|公里/小时|千米每小时|千米/小时|英里每小时|英里/小时|米每秒|米/秒|(?:km/h|kph|mph|m/s)(?-u:\b))")
        ],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<VelocityData> {
            let unit = unit_name(regex_group(&tokens[1], 1)?)?;
            Some(VelocityData { value: numeral_value(&tokens[0])?, unit })
        },
    }
}

/// 时速120公里, 每小时80公里.
fn rule_per_hour_prefix() -> Rule {
    rule! {
        name: "时速|每小时 <number> 公里",
        pattern: [
            re!(r"时速|時速|每小时|每小時"),
            pred!(is_positive),
            re!(r"公里|千米")
        ],
        optional_phrases: ["时速", "時速", "每小时", "每小時"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<VelocityData> {
            Some(VelocityData { value: numeral_value(&tokens[1])?, unit: "km/h" })
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_numeral_unit(), rule_per_hour_prefix()]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::Velocity(vd) => Some((ResolvedValue::Velocity { value: vd.value, unit: vd.unit.to_string() }, false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::numeral;
    use crate::{Locale, RuleRegistry, analyze_with};

    fn speeds(input: &str) -> Vec<(String, ResolvedValue)> {
        let registry = RuleRegistry::from_rules(
            Locale::ZhCn,
            vec![(Dimension::Velocity, rules()), (Dimension::Numeral, numeral::rules())],
        );
        analyze_with(&registry, input, &Context::default(), &Options::only([Dimension::Velocity]))
            .unwrap()
            .into_iter()
            .map(|a| (a.text, a.value))
            .collect()
    }

    fn speed(value: f64, unit: &str) -> ResolvedValue {
        ResolvedValue::Velocity { value, unit: unit.to_string() }
    }

    #[test]
    fn velocity_examples() {
        let cases = [
            ("60公里每小时", speed(60.0, "km/h")),
            ("八十千米/小时", speed(80.0, "km/h")),
            ("时速120公里", speed(120.0, "km/h")),
            ("每小时80公里", speed(80.0, "km/h")),
            ("5m/s", speed(5.0, "m/s")),
            ("三米每秒", speed(3.0, "m/s")),
            ("30mph", speed(30.0, "mph")),
        ];
        for (input, expected) in cases {
            assert_eq!(speeds(input), vec![(input.to_string(), expected)], "{input}");
        }
    }

    #[test]
    fn a_distance_alone_is_not_a_speed() {
        assert!(speeds("跑了五公里").is_empty());
    }
}
