use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

use crate::time_expr::Grain;

/// Move `dt` by `amount` units of `grain`. Month arithmetic clamps the day
/// (Jan 31 + 1 month is the last day of February).
pub fn shift_datetime_by_grain(dt: NaiveDateTime, amount: i64, grain: Grain) -> Option<NaiveDateTime> {
    let delta = match grain {
        Grain::NoGrain => return Some(dt),
        Grain::Second => TimeDelta::try_seconds(amount)?,
        Grain::Minute => TimeDelta::try_minutes(amount)?,
        Grain::Hour => TimeDelta::try_hours(amount)?,
        Grain::Day => TimeDelta::try_days(amount)?,
        Grain::Week => TimeDelta::try_weeks(amount)?,
        Grain::Month => return add_months(dt, amount),
        Grain::Quarter => return add_months(dt, amount.checked_mul(3)?),
        Grain::Year => return add_months(dt, amount.checked_mul(12)?),
    };
    dt.checked_add_signed(delta)
}

fn add_months(dt: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let zero_based = (dt.year() as i64 * 12 + dt.month0() as i64).checked_add(months)?;
    let year = i32::try_from(zero_based.div_euclid(12)).ok()?;
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = dt.day().min(days_in_month(year, month)?);
    Some(NaiveDate::from_ymd_opt(year, month, day)?.and_time(dt.time()))
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_next.pred_opt()?.day())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn shift_datetime_by_month_clamps_day() {
        assert_eq!(shift_datetime_by_grain(at(2024, 1, 31, 8), 1, Grain::Month), Some(at(2024, 2, 29, 8)));
        assert_eq!(shift_datetime_by_grain(at(2016, 3, 31, 0), -1, Grain::Month), Some(at(2016, 2, 29, 0)));
    }

    #[test]
    fn shift_datetime_by_quarter_advances_three_months() {
        assert_eq!(shift_datetime_by_grain(at(2023, 11, 15, 0), 1, Grain::Quarter), Some(at(2024, 2, 15, 0)));
    }

    #[test]
    fn shift_datetime_by_hours_crosses_midnight() {
        assert_eq!(shift_datetime_by_grain(at(2016, 12, 31, 22), 3, Grain::Hour), Some(at(2017, 1, 1, 1)));
    }

    #[test]
    fn out_of_range_shifts_are_none() {
        let now = at(2016, 12, 8, 11);
        for grain in [Grain::Month, Grain::Quarter, Grain::Year, Grain::Day, Grain::Second] {
            assert_eq!(shift_datetime_by_grain(now, i64::MAX, grain), None, "{grain:?}");
            assert_eq!(shift_datetime_by_grain(now, i64::MIN, grain), None, "{grain:?}");
        }
        assert_eq!(shift_datetime_by_grain(now, 1_000_000, Grain::Year), None);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2016, 2), Some(29));
        assert_eq!(days_in_month(2017, 2), Some(28));
        assert_eq!(days_in_month(2017, 12), Some(31));
    }
}
