use crate::{NumeralData, Token, TokenKind};

/// Return the first regex capture group from `tokens[0]`.
pub fn first_match_lower(tokens: &[Token]) -> Option<String> {
    match &tokens.first()?.kind {
        // Groups are already lowercased by the parser.
        TokenKind::RegexMatch(groups) => groups.first().cloned(),
        _ => None,
    }
}

/// Helper to create a `NumeralData` with given `value`.
pub fn make_numeral(value: f64) -> NumeralData {
    let grain = infer_grain(value);
    let abs_val = value.abs();
    let multipliable = grain.map(|g| (abs_val - 10f64.powi(g as i32)).abs() < f64::EPSILON).unwrap_or(false);
    NumeralData { value, grain, multipliable }
}

/// Infer the power-of-ten "grain" for a numeral value. For integers that end
/// with at least one zero, the grain is the count of trailing zeros; otherwise
/// `None`.
pub fn infer_grain(value: f64) -> Option<u32> {
    let abs_val = value.abs();

    if abs_val == 0.0 || value.fract().abs() > f64::EPSILON {
        return None;
    }

    let mut n = abs_val as i64;
    let mut grain = 0u32;
    while n % 10 == 0 {
        grain += 1;
        n /= 10;
    }

    if grain > 0 { Some(grain) } else { None }
}

/// Map full-width digits and separators to ASCII and drop `,` grouping.
pub fn normalize_digits(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '０'..='９' => char::from_digit(c as u32 - '０' as u32, 10),
            '．' => Some('.'),
            ',' | '，' => None,
            _ => Some(c),
        })
        .collect()
}

/// Parse an Arabic-digit number (full-width digits and `,` grouping allowed).
pub fn parse_decimal(s: &str) -> Option<f64> {
    normalize_digits(s).parse::<f64>().ok()
}

/// Value of a single Chinese digit character.
pub fn han_digit(c: char) -> Option<i64> {
    let v = match c {
        '零' | '〇' => 0,
        '一' | '壹' | '幺' => 1,
        '二' | '两' | '贰' | '兩' => 2,
        '三' | '叁' => 3,
        '四' | '肆' => 4,
        '五' | '伍' => 5,
        '六' | '陆' => 6,
        '七' | '柒' => 7,
        '八' | '捌' => 8,
        '九' | '玖' => 9,
        _ => return None,
    };
    Some(v)
}

/// Multiplier of a positional unit character below 万.
fn han_small_unit(c: char) -> Option<i64> {
    match c {
        '十' | '拾' => Some(10),
        '百' | '佰' => Some(100),
        '千' | '仟' => Some(1000),
        _ => None,
    }
}

fn han_large_unit(c: char) -> Option<i64> {
    match c {
        '万' | '萬' => Some(10_000),
        '亿' | '億' => Some(100_000_000),
        _ => None,
    }
}

/// Parse a Chinese integer such as `三千五百零二`, `十二`, `两万三` or `二零一六`.
///
/// Without any unit character the string is read digit by digit (years and
/// phone-style readings). A trailing bare digit after 百 or a larger unit is
/// scaled one place down (`三千五` is 3500), unless a 零 marks it as units.
pub fn parse_han_integer(s: &str) -> Option<i64> {
    let chars: Vec<char> = s.chars().collect();
    let first = *chars.first()?;

    let has_unit = chars.iter().any(|&c| han_small_unit(c).is_some() || han_large_unit(c).is_some());
    if !has_unit {
        return chars.iter().try_fold(0i64, |acc, &c| acc.checked_mul(10)?.checked_add(han_digit(c)?));
    }

    // 百, 千, 万 and 亿 need a leading digit; a leading 十 means 10.
    if han_large_unit(first).is_some() || matches!(first, '百' | '佰' | '千' | '仟') {
        return None;
    }

    let mut total: i64 = 0;
    let mut section: i64 = 0;
    let mut current: Option<i64> = None;
    let mut last_unit: i64 = 1;
    let mut seen_zero = false;

    for &c in &chars {
        if let Some(d) = han_digit(c) {
            if current.is_some_and(|prev| prev != 0) && d != 0 {
                // Two digits in a row inside a unit-bearing numeral: 三四百 and friends.
                return None;
            }
            if d == 0 {
                seen_zero = true;
            }
            current = Some(d);
        } else if let Some(unit) = han_small_unit(c) {
            let digit = match current.take() {
                Some(d) => d,
                None if unit == 10 => 1,
                None => return None,
            };
            section = section.checked_add(digit.checked_mul(unit)?)?;
            last_unit = unit;
            seen_zero = false;
        } else if let Some(unit) = han_large_unit(c) {
            section = section.checked_add(current.take().unwrap_or(0))?;
            total = if unit == 100_000_000 {
                total.checked_add(section)?.checked_mul(unit)?
            } else {
                total.checked_add(section.checked_mul(unit)?)?
            };
            section = 0;
            last_unit = unit;
            seen_zero = false;
        } else {
            return None;
        }
    }

    if let Some(d) = current {
        let tail = if last_unit >= 100 && !seen_zero { d.checked_mul(last_unit / 10)? } else { d };
        section = section.checked_add(tail)?;
    }

    total.checked_add(section)
}

/// Read a run of Chinese or Arabic digits as the fractional part after 点.
pub fn fraction_digits(s: &str) -> Option<f64> {
    let digits: String = s
        .chars()
        .map(|c| han_digit(c).map(|d| char::from_digit(d as u32, 10)).unwrap_or(Some(c)))
        .collect::<Option<String>>()?;
    format!("0.{}", normalize_digits(&digits)).parse::<f64>().ok()
}

/// Multiplier for a unit suffix after digits (`3万`, `1.5亿`, `5k`).
pub fn suffix_multiplier(s: &str) -> Option<f64> {
    let m = match s {
        "十" => 10.0,
        "百" => 100.0,
        "千" | "k" => 1_000.0,
        "万" | "w" => 10_000.0,
        "十万" => 100_000.0,
        "百万" => 1_000_000.0,
        "千万" => 10_000_000.0,
        "亿" => 100_000_000.0,
        "万亿" => 1_000_000_000_000.0,
        _ => return None,
    };
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn han_integers() {
        let cases = [
            ("三", 3),
            ("十", 10),
            ("十二", 12),
            ("二十", 20),
            ("二十三", 23),
            ("一百零五", 105),
            ("三千五", 3500),
            ("三千零五", 3005),
            ("两万三", 23_000),
            ("一万零三", 10_003),
            ("三千五百零二", 3502),
            ("十万", 100_000),
            ("一亿二千万", 120_000_000),
            ("壹佰贰拾", 120),
            ("二零一六", 2016),
            ("一一零", 110),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_han_integer(input), Some(expected), "{input}");
        }
    }

    #[test]
    fn han_integers_reject_malformed() {
        for input in ["", "万", "百五", "千", "亿三", "三四百", "天"] {
            assert_eq!(parse_han_integer(input), None, "{input}");
        }
    }

    #[test]
    fn han_integers_beyond_i64_are_none() {
        for input in ["一亿亿亿亿亿亿", "九九九九九九九九九九九九九九九九九九九九", "九千万亿亿"] {
            assert_eq!(parse_han_integer(input), None, "{input}");
        }
    }

    #[test]
    fn digits_normalize() {
        assert_eq!(parse_decimal("１２３"), Some(123.0));
        assert_eq!(parse_decimal("1,200,000"), Some(1_200_000.0));
        assert_eq!(parse_decimal("3.5"), Some(3.5));
        assert_eq!(fraction_digits("五"), Some(0.5));
        assert_eq!(fraction_digits("二五"), Some(0.25));
    }

    #[test]
    fn grain_inference() {
        assert_eq!(infer_grain(3000.0), Some(3));
        assert_eq!(infer_grain(3.5), None);
        assert!(make_numeral(100.0).multipliable);
        assert!(!make_numeral(300.0).multipliable);
    }
}
