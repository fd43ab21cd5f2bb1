//! Per-dimension rule catalogs (zh-CN) and their resolvers.
//!
//! Each dimension module exposes `rules()` (its catalog) and `resolve()` (turn
//! one of its tokens into a value). `DISPATCH` ties them to the `Dimension`
//! tag, in declaration order, so the engine never matches on dimensions itself.

pub(crate) mod age;
pub(crate) mod currency;
pub(crate) mod digit_sequence;
pub(crate) mod duration;
pub(crate) mod numeral;
pub(crate) mod ordinal;
pub(crate) mod phone;
pub(crate) mod quantity;
pub(crate) mod repeat;
pub(crate) mod temperature;
pub(crate) mod time;
pub(crate) mod velocity;

use crate::{Context, Dimension, Hint, Options, ResolvedValue, Rule, Token, TokenKind};

pub(crate) type Resolver = fn(&Token, Hint, &Context, &Options) -> Option<(ResolvedValue, bool)>;

pub(crate) struct DimensionEntry {
    pub dim: Dimension,
    pub rules: fn() -> Vec<Rule>,
    pub resolve: Resolver,
}

// Indexed by `Dimension as usize`.
pub(crate) static DISPATCH: [DimensionEntry; 12] = [
    DimensionEntry { dim: Dimension::Time, rules: time::rules, resolve: time::resolve },
    DimensionEntry { dim: Dimension::Duration, rules: duration::rules, resolve: duration::resolve },
    DimensionEntry { dim: Dimension::Repeat, rules: repeat::rules, resolve: repeat::resolve },
    DimensionEntry { dim: Dimension::Currency, rules: currency::rules, resolve: currency::resolve },
    DimensionEntry { dim: Dimension::Quantity, rules: quantity::rules, resolve: quantity::resolve },
    DimensionEntry { dim: Dimension::Velocity, rules: velocity::rules, resolve: velocity::resolve },
    DimensionEntry { dim: Dimension::Temperature, rules: temperature::rules, resolve: temperature::resolve },
    DimensionEntry { dim: Dimension::Age, rules: age::rules, resolve: age::resolve },
    DimensionEntry { dim: Dimension::PhoneNumber, rules: phone::rules, resolve: phone::resolve },
    DimensionEntry { dim: Dimension::DigitSequence, rules: digit_sequence::rules, resolve: digit_sequence::resolve },
    DimensionEntry { dim: Dimension::Ordinal, rules: ordinal::rules, resolve: ordinal::resolve },
    DimensionEntry { dim: Dimension::Numeral, rules: numeral::rules, resolve: numeral::resolve },
];

pub(crate) fn resolve_token(
    dim: Dimension,
    token: &Token,
    hint: Hint,
    context: &Context,
    options: &Options,
) -> Option<(ResolvedValue, bool)> {
    (DISPATCH[dim as usize].resolve)(token, hint, context, options)
}

/// Capture group `idx` of a raw regex token; unmatched groups are `None`.
pub(crate) fn regex_group(token: &Token, idx: usize) -> Option<&str> {
    match &token.kind {
        TokenKind::RegexMatch(groups) => groups.get(idx).map(String::as_str).filter(|g| !g.is_empty()),
        _ => None,
    }
}

/// Value of a numeral token.
pub(crate) fn numeral_value(token: &Token) -> Option<f64> {
    match &token.kind {
        TokenKind::Numeral(nd) => Some(nd.value),
        _ => None,
    }
}
