use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::rules::time::helpers::shift::shift_datetime_by_grain;
use crate::time_expr::Grain;

/// Truncate `dt` to the start of its enclosing `grain` unit. Weeks start on Monday.
pub fn start_of(grain: Grain, dt: NaiveDateTime) -> NaiveDateTime {
    let date = dt.date();
    match grain {
        Grain::NoGrain | Grain::Second => dt.with_nanosecond(0).unwrap_or(dt),
        Grain::Minute => date.and_hms_opt(dt.hour(), dt.minute(), 0).unwrap_or(dt),
        Grain::Hour => date.and_hms_opt(dt.hour(), 0, 0).unwrap_or(dt),
        Grain::Day => midnight(date),
        Grain::Week => {
            let back = TimeDelta::days(date.weekday().num_days_from_monday() as i64);
            midnight(date - back)
        }
        Grain::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).map(midnight).unwrap_or(dt),
        Grain::Quarter => {
            let first_month = (date.month0() / 3) * 3 + 1;
            NaiveDate::from_ymd_opt(date.year(), first_month, 1).map(midnight).unwrap_or(dt)
        }
        Grain::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).map(midnight).unwrap_or(dt),
    }
}

/// Exclusive end of the `grain` unit starting at `start`.
pub fn end_of(grain: Grain, start: NaiveDateTime) -> Option<NaiveDateTime> {
    shift_datetime_by_grain(start, 1, grain)
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn start_of_week_aligns_to_monday() {
        assert_eq!(start_of(Grain::Week, at(2016, 12, 8, 11, 30)), at(2016, 12, 5, 0, 0));
    }

    #[test]
    fn start_of_quarter_returns_first_month() {
        assert_eq!(start_of(Grain::Quarter, at(2016, 12, 8, 11, 30)), at(2016, 10, 1, 0, 0));
        assert_eq!(start_of(Grain::Quarter, at(2013, 2, 12, 4, 30)), at(2013, 1, 1, 0, 0));
    }

    #[test]
    fn day_unit_is_one_day_long() {
        let start = start_of(Grain::Day, at(2024, 8, 31, 12, 0));
        assert_eq!(start, at(2024, 8, 31, 0, 0));
        assert_eq!(end_of(Grain::Day, start), Some(at(2024, 9, 1, 0, 0)));
    }
}
