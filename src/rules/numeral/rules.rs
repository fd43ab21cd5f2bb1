use crate::engine::BucketMask;
use crate::{NumeralData, Rule, Token};

use crate::rules::numeral::helpers::{
    first_match_lower, fraction_digits, make_numeral, parse_decimal, parse_han_integer, suffix_multiplier,
};
use crate::rules::numeral::predicates::{is_numeral, is_positive};
use crate::rules::{numeral_value, regex_group};

const DIGITS: u32 = BucketMask::HAS_DIGITS.bits();
const HAN: u32 = BucketMask::HAS_HAN_NUM.bits();

/// Arabic digits, with optional `,` grouping and decimals. Full-width digits count.
fn rule_digits() -> Rule {
    rule! {
        name: "number (digits)",
        pattern: [
            re!(r"(?:[0-9０-９]{1,3}(?:,[0-9０-９]{3})+|[0-9０-９]+)(?:[.．][0-9０-９]+)?")
        ],
        buckets: DIGITS,
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let m = first_match_lower(tokens)?;
            parse_decimal(&m).map(make_numeral)
        },
    }
}

/// Chinese integers: 三, 十二, 一百零五, 两万三, 壹佰贰拾, 二零一六.
fn rule_han_integer() -> Rule {
    rule! {
        name: "integer (han)",
        pattern: [
            re!(r"[零〇一二两兩三四五六七八九十百千万亿壹贰叁肆伍陆柒捌玖拾佰仟萬億]+")
        ],
        buckets: HAN,
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let m = first_match_lower(tokens)?;
            parse_han_integer(&m).map(|v| make_numeral(v as f64))
        },
    }
}

/// 三点五, 零点二五.
fn rule_han_decimal() -> Rule {
    rule! {
        name: "decimal (han)",
        pattern: [
            re!(r"([零〇一二两三四五六七八九十百千万亿]+)点([零〇一二三四五六七八九]+)")
        ],
        buckets: HAN,
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let int = parse_han_integer(regex_group(&tokens[0], 1)?)?;
            let frac = fraction_digits(regex_group(&tokens[0], 2)?)?;
            Some(make_numeral(int as f64 + frac))
        },
    }
}

/// 3万, 1.5亿, 5k, 3千万.
fn rule_unit_suffix() -> Rule {
    rule! {
        name: "number with unit suffix",
        pattern: [
            pred!(is_numeral),
            re!(r"(?i)(万亿|千万|百万|十万|万|亿|千|百|k|w)")
        ],
        buckets: DIGITS,
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let base = numeral_value(&tokens[0])?;
            let mult = suffix_multiplier(regex_group(&tokens[1], 1)?)?;
            Some(make_numeral(base * mult))
        },
    }
}

/// 负三, -5, 负1.5.
fn rule_negative() -> Rule {
    rule! {
        name: "negative numbers",
        pattern: [
            re!(r"负|-|−"),
            pred!(is_positive)
        ],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            numeral_value(&tokens[1]).map(|v| make_numeral(-v))
        },
    }
}

/// 三分之一 is 1/3: the denominator comes first.
fn rule_fraction() -> Rule {
    rule! {
        name: "fraction (分之)",
        pattern: [
            pred!(is_positive),
            re!(r"分之"),
            pred!(is_numeral)
        ],
        required_phrases: ["分之"],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let denominator = numeral_value(&tokens[0])?;
            let numerator = numeral_value(&tokens[2])?;
            Some(make_numeral(numerator / denominator))
        },
    }
}

/// 1/5, 3/15.
fn rule_fraction_slash() -> Rule {
    rule! {
        name: "fraction (slash)",
        pattern: [
            re!(r"(\d+)/(\d+)")
        ],
        buckets: DIGITS,
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let numerator = parse_decimal(regex_group(&tokens[0], 1)?)?;
            let denominator = parse_decimal(regex_group(&tokens[0], 2)?)?;
            if denominator == 0.0 {
                return None;
            }
            Some(make_numeral(numerator / denominator))
        },
    }
}

/// 百分之二十.
fn rule_percent_prefix() -> Rule {
    rule! {
        name: "percent (百分之)",
        pattern: [
            re!(r"百分之"),
            pred!(is_numeral)
        ],
        required_phrases: ["百分之"],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            numeral_value(&tokens[1]).map(|v| make_numeral(v / 100.0))
        },
    }
}

/// 20%.
fn rule_percent_suffix() -> Rule {
    rule! {
        name: "percent (%)",
        pattern: [
            pred!(is_numeral),
            re!(r"%|％")
        ],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            numeral_value(&tokens[0]).map(|v| make_numeral(v / 100.0))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_digits(),
        rule_han_integer(),
        rule_han_decimal(),
        rule_unit_suffix(),
        rule_negative(),
        rule_fraction(),
        rule_fraction_slash(),
        rule_percent_prefix(),
        rule_percent_suffix(),
    ]
}
