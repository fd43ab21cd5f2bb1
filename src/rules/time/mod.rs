//! Time expressions: 明天下午三点, 2016年12月9日, 下周三, 三天后, 农历八月十五.
//!
//! Rules build unresolved [`TimeExpr`] trees; [`resolve`] turns one into a
//! concrete instant or interval against the context's reference instant.

pub mod helpers;
pub(crate) mod lunar;
pub(crate) mod normalize;
pub(crate) mod predicates;
mod rules_dates;
mod rules_holidays;
mod rules_intervals;
mod rules_lunar;
mod rules_nominal;
mod rules_parts_of_day;
mod rules_periods;
mod rules_relative;
mod rules_time_of_day;
mod rules_weekdays;

#[cfg(test)]
mod tests;

use tracing::trace;

use crate::rules::time::helpers::boundaries::start_of;
use crate::time_expr::Grain;
use crate::{Context, Hint, Options, ResolvedValue, Rule, Token};

pub fn rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(rules_nominal::get());
    rules.extend(rules_dates::get());
    rules.extend(rules_weekdays::get());
    rules.extend(rules_time_of_day::get());
    rules.extend(rules_parts_of_day::get());
    rules.extend(rules_relative::get());
    rules.extend(rules_intervals::get());
    rules.extend(rules_holidays::get());
    rules.extend(rules_lunar::get());
    rules.extend(rules_periods::get());
    rules
}

/// Resolve a time token. Lunar-hinted nodes are converted to solar dates
/// first; everything else goes straight to normalization.
pub fn resolve(token: &Token, hint: Hint, context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    let td = predicates::time_data(token)?;
    let now = start_of(Grain::Second, context.reference.naive_local());

    let expr = if hint == Hint::Lunar { lunar::solarize(&td.expr, now)? } else { td.expr.clone() };
    let object = normalize::normalize(&expr, now)?;
    trace!(expr = ?expr, start = %object.start, grain = ?object.grain, "time normalized");

    let value = object.to_value(*context.reference.offset())?;
    Some((ResolvedValue::Time(value), td.latent))
}
