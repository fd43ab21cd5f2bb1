//! Phone numbers: mainland mobiles, landlines with an area code, and
//! 400/800 service lines.
//!
//! The value keeps digits only. A `+86`/`0086` prefix is rendered as `+86`.

use crate::engine::BucketMask;
use crate::rules::regex_group;
use crate::{Context, Hint, Options, PhoneData, ResolvedValue, Rule, Token, TokenKind};

const DIGITS: u32 = BucketMask::HAS_DIGITS.bits();

fn join(tokens: &[Token], groups: &[usize]) -> Option<String> {
    let mut digits = String::new();
    for &idx in groups {
        if let Some(part) = regex_group(&tokens[0], idx) {
            digits.extend(part.chars().filter(char::is_ascii_digit));
        }
    }
    (!digits.is_empty()).then_some(digits)
}

/// 13812345678, 138 1234 5678, +86 138-1234-5678.
fn rule_mobile() -> Rule {
    rule! {
        name: "mobile phone number",
        pattern: [
            re!(r"(?:(\+86|0086)[\s-]?|(?-u:\b))(1[3-9]\d)[\s-]?(\d{4})[\s-]?(\d{4})(?-u:\b)")
        ],
        buckets: DIGITS,
        prod: |tokens: &[Token]| -> Option<PhoneData> {
            let local = join(tokens, &[2, 3, 4])?;
            let digits = match regex_group(&tokens[0], 1) {
                Some(_) => format!("+86{local}"),
                None => local,
            };
            Some(PhoneData { digits })
        },
    }
}

/// 010-12345678, (021)87654321, 0755 1234567.
fn rule_landline() -> Rule {
    rule! {
        name: "landline phone number",
        pattern: [
            re!(r"(?:\((0\d{2,3})\)|(?-u:\b)(0\d{2,3}))[\s-]?(\d{7,8})(?-u:\b)")
        ],
        buckets: DIGITS,
        prod: |tokens: &[Token]| -> Option<PhoneData> {
            join(tokens, &[1, 2, 3]).map(|digits| PhoneData { digits })
        },
    }
}

/// 400-810-8888, 800 820 8820.
fn rule_service_line() -> Rule {
    rule! {
        name: "service phone number",
        pattern: [
            re!(r"(?-u:\b)([48]00)[\s-]?(\d{3})[\s-]?(\d{4})(?-u:\b)")
        ],
        buckets: DIGITS,
        prod: |tokens: &[Token]| -> Option<PhoneData> {
            join(tokens, &[1, 2, 3]).map(|digits| PhoneData { digits })
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_mobile(), rule_landline(), rule_service_line()]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::PhoneNumber(pd) => Some((ResolvedValue::PhoneNumber { value: pd.digits.clone() }, false)),
        _ => None,
    }
}
