//! Token predicates shared by the time rule catalogs.

use crate::time_expr::{Grain, PeriodPart, TimeData, TimeExpr};
use crate::{Token, TokenKind};

pub(crate) fn time_data(token: &Token) -> Option<&TimeData> {
    match &token.kind {
        TokenKind::Time(td) => Some(td),
        _ => None,
    }
}

pub(crate) fn time_expr(token: &Token) -> Option<&TimeExpr> {
    time_data(token).map(|td| &td.expr)
}

/// A time that is not latent.
pub fn is_concrete_time(token: &Token) -> bool {
    time_data(token).is_some_and(|td| !td.latent)
}

pub fn is_part_of_day(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::PartOfDay(_)))
}

pub fn is_time_of_day(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::TimeOfDay { .. }))
}

pub fn is_year_only(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::Date { year: Some(_), month: None, day: None }))
}

pub fn is_month_only(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::Date { year: None, month: Some(_), day: None }))
}

pub fn is_day_only(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::Date { year: None, month: None, day: Some(_) }))
}

pub fn is_year_month(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::Date { year: Some(_), month: Some(_), day: None }))
}

/// Rough size of the period an expression names, used to order the two
/// halves of an intersection from coarse to fine.
pub(crate) fn scope(expr: &TimeExpr) -> u8 {
    match expr {
        TimeExpr::Reference => 10,
        TimeExpr::Cycle { grain, .. } | TimeExpr::Shift { grain, .. } | TimeExpr::Window { grain, .. } => {
            grain_scope(*grain)
        }
        TimeExpr::Date { year: Some(_), month: None, day: None } => 80,
        TimeExpr::Date { day: None, .. } => 60,
        TimeExpr::Date { .. } | TimeExpr::Lunar { .. } | TimeExpr::Holiday(_) | TimeExpr::Weekday { .. } => 40,
        TimeExpr::Weekend { .. } => 50,
        TimeExpr::Quarter { .. } | TimeExpr::Season(_) => 70,
        TimeExpr::Part { base, .. } => match scope(base) {
            80 => 65,
            60 => 55,
            other => other.saturating_sub(5),
        },
        TimeExpr::PartOfDay(_) => 35,
        TimeExpr::TimeOfDay { second: Some(_), .. } => 10,
        TimeExpr::TimeOfDay { minute: Some(_), .. } => 20,
        TimeExpr::TimeOfDay { .. } => 30,
        TimeExpr::Intersect { inner, .. } => scope(inner),
        TimeExpr::Interval { start, .. } => scope(start),
    }
}

pub(crate) fn grain_scope(grain: Grain) -> u8 {
    match grain {
        Grain::Year => 80,
        Grain::Quarter => 70,
        Grain::Month => 60,
        Grain::Week => 50,
        Grain::Day => 40,
        Grain::Hour => 30,
        Grain::Minute => 20,
        Grain::Second | Grain::NoGrain => 10,
    }
}

/// Expressions that may stand as the outer part of an intersection.
pub(crate) fn is_anchorable(expr: &TimeExpr) -> bool {
    !matches!(expr, TimeExpr::Interval { .. } | TimeExpr::Window { .. } | TimeExpr::Reference)
}

/// A period that 初/中/底 can split.
pub(crate) fn is_divisible(expr: &TimeExpr) -> bool {
    match expr {
        TimeExpr::Cycle { grain, .. } => matches!(grain, Grain::Month | Grain::Year | Grain::Quarter),
        TimeExpr::Date { day: None, .. } | TimeExpr::Quarter { .. } | TimeExpr::Season(_) => true,
        _ => false,
    }
}

pub(crate) fn part_of(expr: TimeExpr, part: PeriodPart) -> TimeExpr {
    TimeExpr::Part { base: Box::new(expr), part }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_expr::PartOfDay;

    fn token(expr: TimeExpr) -> Token {
        Token { kind: TokenKind::Time(TimeData::new(expr)) }
    }

    #[test]
    fn date_shapes() {
        let year = token(TimeExpr::Date { year: Some(2016), month: None, day: None });
        let month = token(TimeExpr::Date { year: None, month: Some(3), day: None });
        assert!(is_year_only(&year) && !is_month_only(&year));
        assert!(is_month_only(&month) && !is_year_only(&month));
        assert!(is_year_month(&token(TimeExpr::Date { year: Some(2016), month: Some(3), day: None })));
        assert!(!is_day_only(&token(TimeExpr::Cycle { grain: Grain::Day, offset: 1 })));
    }

    #[test]
    fn scope_orders_coarse_before_fine() {
        let day = TimeExpr::Cycle { grain: Grain::Day, offset: 1 };
        let afternoon = TimeExpr::PartOfDay(PartOfDay::Afternoon);
        let three = TimeExpr::TimeOfDay { hour: 3, minute: None, second: None, ambiguous: true };
        assert!(scope(&day) > scope(&afternoon));
        assert!(scope(&afternoon) > scope(&three));
        let end_of_year = part_of(TimeExpr::Cycle { grain: Grain::Year, offset: 0 }, PeriodPart::Late);
        assert!(scope(&end_of_year) > scope(&TimeExpr::Date { year: None, month: Some(12), day: None }));
    }

    #[test]
    fn latent_times_are_not_concrete() {
        let latent = Token { kind: TokenKind::Time(TimeData::latent(TimeExpr::Date { year: Some(2016), month: None, day: None })) };
        assert!(time_data(&latent).is_some());
        assert!(!is_concrete_time(&latent));
    }
}
