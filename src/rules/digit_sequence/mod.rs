//! Digit strings read one digit at a time: 幺三八, 二〇一六, 007.
//!
//! Only runs that a numeral reading would mangle are claimed: han digit runs
//! of three or more, and Arabic runs with a leading zero.

use crate::engine::BucketMask;
use crate::rules::regex_group;
use crate::{Context, DigitSequenceData, Hint, Options, ResolvedValue, Rule, Token, TokenKind};

fn han_digit(c: char) -> Option<char> {
    let digit = match c {
        '零' | '〇' | '○' => '0',
        '一' | '幺' => '1',
        '二' => '2',
        '三' => '3',
        '四' => '4',
        '五' => '5',
        '六' => '6',
        '七' => '7',
        '八' => '8',
        '九' => '9',
        _ => return None,
    };
    Some(digit)
}

/// 幺三八, 二〇一六, 零五七一.
fn rule_han_digits() -> Rule {
    rule! {
        name: "han digit sequence",
        pattern: [re!(r"[零〇○一幺二三四五六七八九]{3,}")],
        prod: |tokens: &[Token]| -> Option<DigitSequenceData> {
            let digits = regex_group(&tokens[0], 0)?.chars().map(han_digit).collect::<Option<String>>()?;
            Some(DigitSequenceData { digits })
        },
    }
}

/// 007, 0571.
fn rule_leading_zero() -> Rule {
    rule! {
        name: "digit sequence with leading zero",
        pattern: [re!(r"(?-u:\b)(0[0-9]{2,})(?-u:\b)")],
        buckets: BucketMask::HAS_DIGITS.bits(),
        prod: |tokens: &[Token]| -> Option<DigitSequenceData> {
            Some(DigitSequenceData { digits: regex_group(&tokens[0], 1)?.to_string() })
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_han_digits(), rule_leading_zero()]
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::DigitSequence(dd) => Some((ResolvedValue::DigitSequence { value: dd.digits.clone() }, false)),
        _ => None,
    }
}
