pub mod helpers;
pub mod predicates;
pub mod rules;

#[cfg(test)]
mod tests;

use crate::{Context, Hint, Options, ResolvedValue, Rule, Token, TokenKind};

pub fn rules() -> Vec<Rule> {
    rules::get()
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::Numeral(nd) if nd.value.is_finite() => Some((ResolvedValue::Numeral { value: nd.value }, false)),
        _ => None,
    }
}
