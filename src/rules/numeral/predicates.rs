use crate::{Token, TokenKind};

pub fn is_numeral(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Numeral(_))
}

/// Returns true when the token is a positive numeral value (> 0).
pub fn is_positive(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Numeral(nd) if nd.value > 0.0)
}

/// Returns true when the token holds an integral value.
pub fn is_integer(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Numeral(nd) if nd.value.fract().abs() < f64::EPSILON)
}

/// Returns true when the token is a non-negative integer.
pub fn is_natural(t: &Token) -> bool {
    is_integer(t) && matches!(&t.kind, TokenKind::Numeral(nd) if nd.value >= 0.0)
}

/// Returns true when the token represents a numeral in `[MIN, MAX)`.
pub fn number_between<const MIN: i64, const MAX: i64>(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Numeral(nd) if nd.value >= MIN as f64 && nd.value < MAX as f64)
}

/// Integer in `[MIN, MAX)`.
pub fn integer_between<const MIN: i64, const MAX: i64>(t: &Token) -> bool {
    is_integer(t) && number_between::<MIN, MAX>(t)
}
