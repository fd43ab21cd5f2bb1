//! Ordinals: 第三, 第10.

use crate::rules::numeral::predicates::is_natural;
use crate::rules::numeral_value;
use crate::{Context, Dimension, Hint, OrdinalData, Options, ResolvedValue, Rule, Token, TokenKind};

fn rule_ordinal() -> Rule {
    rule! {
        name: "ordinal (第<n>)",
        pattern: [
            re!(r"第"),
            pred!(is_natural)
        ],
        required_phrases: ["第"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<OrdinalData> {
            let value = numeral_value(&tokens[1])?;
            if value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
                return None;
            }
            Some(OrdinalData { value: value as i64 })
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_ordinal()]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::Ordinal(od) => Some((ResolvedValue::Ordinal { value: od.value }, false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::numeral;
    use crate::{Locale, RuleRegistry, analyze_with};

    fn registry() -> RuleRegistry {
        RuleRegistry::from_rules(Locale::ZhCn, vec![(Dimension::Ordinal, rules()), (Dimension::Numeral, numeral::rules())])
    }

    #[test]
    fn ordinals() {
        let registry = registry();
        for (input, expected) in [("第三", 3), ("第10", 10), ("第二十一", 21)] {
            let answers =
                analyze_with(&registry, input, &Context::default(), &crate::Options::only([Dimension::Ordinal]))
                    .unwrap();
            assert_eq!(answers.len(), 1, "{input}");
            assert_eq!(answers[0].value, ResolvedValue::Ordinal { value: expected }, "{input}");
        }
    }

    #[test]
    fn ordinals_beyond_i64_are_dropped() {
        let answers = analyze_with(
            &registry(),
            "第99999999999999999999",
            &Context::default(),
            &crate::Options::only([Dimension::Ordinal]),
        )
        .unwrap();
        assert!(answers.is_empty(), "{answers:?}");
    }
}
