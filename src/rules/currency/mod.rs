//! Amounts of money: 三块五, 100美元, ¥20, 五毛.

use crate::engine::BucketMask;
use crate::rules::numeral::predicates::{integer_between, is_numeral};
use crate::rules::{numeral_value, regex_group};
use crate::{Context, CurrencyData, Dimension, Hint, Options, ResolvedValue, Rule, Token, TokenKind};

const MONEY: u32 = BucketMask::MONEY.bits();

/// ISO 4217 code and the multiplier of a currency unit word.
fn unit_info(unit: &str) -> Option<(&'static str, f64)> {
    let info = match unit {
        "元" | "块" | "塊" | "块钱" | "塊錢" | "人民币" | "rmb" | "cny" | "¥" | "￥" => ("CNY", 1.0),
        "角" | "毛" | "毛钱" => ("CNY", 0.1),
        "分钱" => ("CNY", 0.01),
        "美元" | "美金" | "usd" | "$" => ("USD", 1.0),
        "欧元" | "eur" | "€" => ("EUR", 1.0),
        "英镑" | "gbp" | "£" => ("GBP", 1.0),
        "日元" | "jpy" => ("JPY", 1.0),
        "港币" | "港元" | "hkd" => ("HKD", 1.0),
        _ => return None,
    };
    Some(info)
}

fn is_currency(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Currency(_))
}

fn is_whole_yuan(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Currency(cd) if cd.unit == "CNY" && cd.value.fract().abs() < f64::EPSILON)
}

fn currency_data(t: &Token) -> Option<&CurrencyData> {
    match &t.kind {
        TokenKind::Currency(cd) => Some(cd),
        _ => None,
    }
}

/// 100美元, 3块, 20 usd, 五毛.
fn rule_amount_unit() -> Rule {
    rule! {
        name: "<amount> <currency>",
        pattern: [
            pred!(is_numeral),
            re!(r"(?i)(块钱|塊錢|块|塊|元|人民币|毛钱|毛|角|分钱|美元|美金|欧元|英镑|日元|港币|港元|rmb|cny|usd|eur|gbp|jpy|hkd)")
        ],
        buckets: MONEY,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<CurrencyData> {
            let value = numeral_value(&tokens[0])?;
            let (unit, scale) = unit_info(regex_group(&tokens[1], 1)?)?;
            Some(CurrencyData { value: value * scale, unit })
        },
    }
}

/// ¥20, $5.
fn rule_symbol_amount() -> Rule {
    rule! {
        name: "<currency symbol> <amount>",
        pattern: [
            re!(r"(¥|￥|\$|€|£)"),
            pred!(is_numeral)
        ],
        buckets: MONEY,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<CurrencyData> {
            let (unit, _) = unit_info(regex_group(&tokens[0], 1)?)?;
            Some(CurrencyData { value: numeral_value(&tokens[1])?, unit })
        },
    }
}

fn sum(head: &CurrencyData, tail: &CurrencyData) -> Option<CurrencyData> {
    if tail.unit != head.unit || tail.value >= 1.0 {
        return None;
    }
    Some(CurrencyData { value: head.value + tail.value, unit: head.unit })
}

/// 三块五毛: whole yuan followed by a smaller amount.
fn rule_sum() -> Rule {
    rule! {
        name: "<currency> <currency>",
        pattern: [
            pred!(is_whole_yuan),
            pred!(is_currency)
        ],
        deps: [Dimension::Currency],
        prod: |tokens: &[Token]| -> Option<CurrencyData> {
            sum(currency_data(&tokens[0])?, currency_data(&tokens[1])?)
        },
    }
}

/// 十元零五分钱.
fn rule_sum_with_zero() -> Rule {
    rule! {
        name: "<currency> 零 <currency>",
        pattern: [
            pred!(is_whole_yuan),
            re!(r"零"),
            pred!(is_currency)
        ],
        required_phrases: ["零"],
        deps: [Dimension::Currency],
        prod: |tokens: &[Token]| -> Option<CurrencyData> {
            sum(currency_data(&tokens[0])?, currency_data(&tokens[2])?)
        },
    }
}

/// 三块五: the trailing digit counts dimes.
fn rule_colloquial_dimes() -> Rule {
    rule! {
        name: "<yuan> <dimes>",
        pattern: [
            pred!(is_whole_yuan),
            pred!(integer_between::<1, 10>)
        ],
        deps: [Dimension::Currency],
        prod: |tokens: &[Token]| -> Option<CurrencyData> {
            let head = currency_data(&tokens[0])?;
            Some(CurrencyData { value: head.value + numeral_value(&tokens[1])? / 10.0, unit: head.unit })
        },
    }
}

/// 三块五毛二分: cents written with a bare 分 after a larger amount.
fn rule_trailing_cents() -> Rule {
    rule! {
        name: "<currency> <n> 分",
        pattern: [
            pred!(|t: &Token| matches!(&t.kind, TokenKind::Currency(cd) if cd.unit == "CNY")),
            pred!(integer_between::<1, 10>),
            re!(r"分")
        ],
        deps: [Dimension::Currency],
        prod: |tokens: &[Token]| -> Option<CurrencyData> {
            let head = currency_data(&tokens[0])?;
            Some(CurrencyData { value: head.value + numeral_value(&tokens[1])? / 100.0, unit: head.unit })
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![
        rule_amount_unit(),
        rule_symbol_amount(),
        rule_sum(),
        rule_sum_with_zero(),
        rule_colloquial_dimes(),
        rule_trailing_cents(),
    ]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::Currency(cd) if cd.value.is_finite() => {
            Some((ResolvedValue::Currency { value: round_cents(cd.value), unit: cd.unit.to_string() }, false))
        }
        _ => None,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::numeral;
    use crate::{Locale, RuleRegistry, analyze_with};

    fn amounts(input: &str) -> Vec<(String, ResolvedValue)> {
        let registry = RuleRegistry::from_rules(
            Locale::ZhCn,
            vec![(Dimension::Currency, rules()), (Dimension::Numeral, numeral::rules())],
        );
        analyze_with(&registry, input, &Context::default(), &Options::only([Dimension::Currency]))
            .unwrap()
            .into_iter()
            .map(|a| (a.text, a.value))
            .collect()
    }

    fn money(value: f64, unit: &str) -> ResolvedValue {
        ResolvedValue::Currency { value, unit: unit.to_string() }
    }

    #[test]
    fn currency_examples() {
        let cases = [
            ("三块五", money(3.5, "CNY")),
            ("三块五毛", money(3.5, "CNY")),
            ("三块五毛二分", money(3.52, "CNY")),
            ("十元零五分钱", money(10.05, "CNY")),
            ("五毛", money(0.5, "CNY")),
            ("20块钱", money(20.0, "CNY")),
            ("100美元", money(100.0, "USD")),
            ("100 USD", money(100.0, "USD")),
            ("¥20", money(20.0, "CNY")),
            ("$5", money(5.0, "USD")),
            ("三百欧元", money(300.0, "EUR")),
            ("两万港币", money(20_000.0, "HKD")),
        ];
        for (input, expected) in cases {
            assert_eq!(amounts(input), vec![(input.to_string(), expected)], "{input}");
        }
    }

    #[test]
    fn price_inside_sentence() {
        assert_eq!(amounts("这本书卖35元，不贵"), vec![("35元".to_string(), money(35.0, "CNY"))]);
    }

    #[test]
    fn plain_numbers_are_not_money() {
        assert!(amounts("三个人").is_empty());
    }
}
