//! Chinese lunisolar calendar, lunar years 2000 to 2049.
//!
//! Each year is packed in one word: bits 15..4 flag months 1..12 as long
//! (30 days) or short (29), bits 3..0 name the leap month (0 for none) and
//! bit 16 makes that leap month long.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

use crate::time_expr::TimeExpr;

pub const FIRST_YEAR: i32 = 2000;
pub const LAST_YEAR: i32 = 2049;

const YEAR_INFO: [u32; 50] = [
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
];

// Solar date of lunar 2000-01-01.
fn epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2000, 2, 5)
}

fn info(year: i32) -> Option<u32> {
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        return None;
    }
    YEAR_INFO.get((year - FIRST_YEAR) as usize).copied()
}

/// Leap month of `year`, if it has one.
pub fn leap_month(year: i32) -> Option<u32> {
    info(year).map(|i| i & 0xf).filter(|&m| m != 0)
}

fn leap_month_days(info: u32) -> i64 {
    match info & 0xf {
        0 => 0,
        _ if info & 0x10000 != 0 => 30,
        _ => 29,
    }
}

fn month_days(info: u32, month: u32) -> i64 {
    if info & (0x10000 >> month) != 0 { 30 } else { 29 }
}

fn year_days(info: u32) -> i64 {
    (1..=12).map(|m| month_days(info, m)).sum::<i64>() + leap_month_days(info)
}

/// Solar date of lunar `year`/`month`/`day`; `leap` selects the leap month.
///
/// `None` outside the table, for a leap month the year does not have, or for
/// a day past the end of the month.
pub fn to_solar(year: i32, month: u32, day: u32, leap: bool) -> Option<NaiveDate> {
    let year_info = info(year)?;
    if !(1..=12).contains(&month) || day == 0 {
        return None;
    }
    if leap && leap_month(year) != Some(month) {
        return None;
    }
    let leap_of_year = year_info & 0xf;

    let mut offset: i64 = (FIRST_YEAR..year).filter_map(info).map(year_days).sum();
    for m in 1..month {
        offset += month_days(year_info, m);
        if m == leap_of_year {
            offset += leap_month_days(year_info);
        }
    }
    let length = if leap {
        offset += month_days(year_info, month);
        leap_month_days(year_info)
    } else {
        month_days(year_info, month)
    };
    if day as i64 > length {
        return None;
    }

    epoch()?.checked_add_signed(TimeDelta::try_days(offset + day as i64 - 1)?)
}

/// Next solar occurrence (not before `today`) of a lunar month/day, or the
/// date in `year` when the year is given.
///
/// A leap month recurs irregularly, so without a year the search runs to the
/// end of the table.
pub fn occurrence(year: Option<i32>, month: u32, day: u32, leap: bool, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(year) = year {
        return to_solar(year, month, day, leap);
    }
    let last = if leap { LAST_YEAR } else { today.year() + 1 };
    // The lunar year containing `today` started in this or the previous solar year.
    (today.year() - 1..=last)
        .filter_map(|y| to_solar(y, month, day, leap))
        .find(|date| *date >= today)
}

/// Replace every lunar date inside `expr` by its solar date.
pub fn solarize(expr: &TimeExpr, now: NaiveDateTime) -> Option<TimeExpr> {
    let solarized = match expr {
        TimeExpr::Lunar { year, month, day, leap } => {
            let date = occurrence(*year, *month, *day, *leap, now.date())?;
            TimeExpr::Date { year: Some(date.year()), month: Some(date.month()), day: Some(date.day()) }
        }
        TimeExpr::Intersect { outer, inner } => {
            TimeExpr::intersect(solarize(outer, now)?, solarize(inner, now)?)
        }
        TimeExpr::Interval { start, end } => TimeExpr::Interval {
            start: Box::new(solarize(start, now)?),
            end: Box::new(solarize(end, now)?),
        },
        TimeExpr::Shift { expr, amount, grain } => {
            TimeExpr::Shift { expr: Box::new(solarize(expr, now)?), amount: *amount, grain: *grain }
        }
        TimeExpr::Part { base, part } => TimeExpr::Part { base: Box::new(solarize(base, now)?), part: *part },
        other => other.clone(),
    };
    Some(solarized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_year_dates() {
        assert_eq!(to_solar(2000, 1, 1, false), Some(date(2000, 2, 5)));
        assert_eq!(to_solar(2013, 1, 1, false), Some(date(2013, 2, 10)));
        assert_eq!(to_solar(2024, 1, 1, false), Some(date(2024, 2, 10)));
        assert_eq!(to_solar(2025, 1, 1, false), Some(date(2025, 1, 29)));
        assert_eq!(to_solar(2049, 1, 1, false), Some(date(2049, 2, 2)));
    }

    #[test]
    fn festivals() {
        assert_eq!(to_solar(2016, 8, 15, false), Some(date(2016, 9, 15)));
        assert_eq!(to_solar(2017, 8, 15, false), Some(date(2017, 10, 4)));
        assert_eq!(to_solar(2016, 5, 5, false), Some(date(2016, 6, 9)));
    }

    #[test]
    fn leap_months() {
        assert_eq!(leap_month(2020), Some(4));
        assert_eq!(leap_month(2016), None);
        assert_eq!(to_solar(2020, 4, 1, true), Some(date(2020, 5, 23)));
        assert_eq!(to_solar(2023, 2, 1, true), Some(date(2023, 3, 22)));
        assert_eq!(to_solar(2016, 4, 1, true), None);
    }

    #[test]
    fn out_of_table_and_impossible_days() {
        assert_eq!(to_solar(1999, 1, 1, false), None);
        assert_eq!(to_solar(2050, 1, 1, false), None);
        assert_eq!(to_solar(2016, 1, 31, false), None);
        assert_eq!(to_solar(2016, 13, 1, false), None);
    }

    #[test]
    fn next_occurrence_looks_forward() {
        // Mid-Autumn 2016 has not happened yet on 2016-09-01 but has on 2016-12-08.
        assert_eq!(occurrence(None, 8, 15, false, date(2016, 9, 1)), Some(date(2016, 9, 15)));
        assert_eq!(occurrence(None, 8, 15, false, date(2016, 12, 8)), Some(date(2017, 10, 4)));
        // 正月初五 seen from early January belongs to the lunar year starting that spring.
        assert_eq!(occurrence(None, 1, 5, false, date(2016, 1, 10)), Some(date(2016, 2, 12)));
    }

    #[test]
    fn leap_month_without_year_finds_the_next_leap_year() {
        // 2016 has no leap month; the next 闰四月 is in 2020.
        assert_eq!(occurrence(None, 4, 1, true, date(2016, 12, 8)), Some(date(2020, 5, 23)));
        // No year in the table has a leap eighth month.
        assert_eq!(occurrence(None, 8, 1, true, date(2016, 12, 8)), None);
    }
}
