//! Ages: 三岁, 18周岁, 五岁半, 虚岁六十.

use crate::rules::numeral::predicates::is_positive;
use crate::rules::numeral_value;
use crate::{AgeData, Context, Dimension, Hint, Options, ResolvedValue, Rule, Token, TokenKind};

const MAX_AGE: f64 = 150.0;

fn plausible(value: f64) -> Option<AgeData> {
    (value > 0.0 && value <= MAX_AGE).then_some(AgeData { value })
}

fn is_whole_age(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Age(ad) if ad.value.fract() == 0.0)
}

/// 三岁, 18周岁, 二十虚岁.
fn rule_numeral_sui() -> Rule {
    rule! {
        name: "<number> 岁",
        pattern: [
            pred!(is_positive),
            re!(r"(?:周|週|虚|虛)?(?:岁|歲)")
        ],
        optional_phrases: ["岁", "歲"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<AgeData> {
            plausible(numeral_value(&tokens[0])?)
        },
    }
}

/// 虚岁六十, 年龄35.
fn rule_prefix() -> Rule {
    rule! {
        name: "虚岁|周岁|年龄 <number>",
        pattern: [
            re!(r"(虚岁|虛歲|周岁|週歲|年龄|年齡)(?:是|为|為)?"),
            pred!(is_positive)
        ],
        optional_phrases: ["虚岁", "虛歲", "周岁", "週歲", "年龄", "年齡"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<AgeData> {
            plausible(numeral_value(&tokens[1])?)
        },
    }
}

/// 五岁半.
fn rule_and_half() -> Rule {
    rule! {
        name: "<age> 半",
        pattern: [pred!(is_whole_age), re!(r"半")],
        required_phrases: ["半"],
        deps: [Dimension::Age],
        prod: |tokens: &[Token]| -> Option<AgeData> {
            match &tokens[0].kind {
                TokenKind::Age(ad) => plausible(ad.value + 0.5),
                _ => None,
            }
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_numeral_sui(), rule_prefix(), rule_and_half()]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::Age(ad) => Some((ResolvedValue::Age { value: ad.value }, false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::numeral;
    use crate::{Locale, RuleRegistry, analyze_with};

    fn ages(input: &str) -> Vec<(String, f64)> {
        let registry = RuleRegistry::from_rules(
            Locale::ZhCn,
            vec![(Dimension::Age, rules()), (Dimension::Numeral, numeral::rules())],
        );
        analyze_with(&registry, input, &Context::default(), &Options::only([Dimension::Age]))
            .unwrap()
            .into_iter()
            .filter_map(|a| match a.value {
                ResolvedValue::Age { value } => Some((a.text, value)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn age_examples() {
        let cases = [("三岁", 3.0), ("18周岁", 18.0), ("五岁半", 5.5), ("虚岁六十", 60.0), ("二十歲", 20.0)];
        for (input, expected) in cases {
            assert_eq!(ages(input), vec![(input.to_string(), expected)], "{input}");
        }
    }

    #[test]
    fn age_inside_a_sentence() {
        assert_eq!(ages("我女儿今年七岁了"), vec![("七岁".to_string(), 7.0)]);
    }

    #[test]
    fn implausible_ages_are_dropped() {
        assert!(ages("200岁").is_empty());
        assert!(ages("0岁").is_empty());
    }
}
