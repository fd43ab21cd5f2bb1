//! Resolution of a [`TimeExpr`] against the reference instant.
//!
//! Everything here works on naive datetimes in the reference's own offset;
//! [`TimeObject::to_value`] attaches the offset at the very end.
//!
//! `normalize` picks the occurrence the speaker most likely means: the next
//! one not entirely in the past. `within` resolves an expression inside an
//! already resolved anchor, which is how intersections are computed.

use chrono::{Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};

use crate::rules::time::helpers::boundaries::{end_of, midnight, start_of};
use crate::rules::time::helpers::shift::{days_in_month, shift_datetime_by_grain};
use crate::rules::time::lunar;
use crate::time_expr::{Grain, Holiday, PartOfDay, PeriodPart, Season, TimeExpr, finer, reset_to};
use crate::value::TimeValue;

// Upper bound on the days scanned when filling a field inside an anchor.
const MAX_SCAN_DAYS: i64 = 400;

/// A resolved occurrence: the `grain` unit starting at `start`, or the
/// explicit range `[start, end)` when `end` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeObject {
    pub start: NaiveDateTime,
    pub grain: Grain,
    pub end: Option<NaiveDateTime>,
}

impl TimeObject {
    fn unit(start: NaiveDateTime, grain: Grain) -> Self {
        TimeObject { start, grain, end: None }
    }

    fn range(start: NaiveDateTime, end: NaiveDateTime, grain: Grain) -> Self {
        TimeObject { start, grain, end: Some(end) }
    }

    fn day(date: NaiveDate) -> Self {
        TimeObject::unit(midnight(date), Grain::Day)
    }

    /// Exclusive end of the occurrence.
    pub fn end(&self) -> Option<NaiveDateTime> {
        match self.end {
            Some(end) => Some(end),
            None => end_of(self.grain, self.start),
        }
    }

    fn is_over(&self, now: NaiveDateTime) -> bool {
        self.end().is_none_or(|end| end <= now)
    }

    pub fn to_value(self, offset: FixedOffset) -> Option<TimeValue> {
        let local = |dt: NaiveDateTime| offset.from_local_datetime(&dt).single();
        let grain = if self.grain == Grain::NoGrain { Grain::Second } else { self.grain };
        match self.end {
            Some(end) => Some(TimeValue::Interval { from: local(self.start)?, to: local(end)?, grain }),
            None => Some(TimeValue::Instant { value: local(self.start)?, grain }),
        }
    }
}

pub(crate) fn normalize(expr: &TimeExpr, now: NaiveDateTime) -> Option<TimeObject> {
    let today = now.date();
    match expr {
        TimeExpr::Reference => Some(TimeObject::unit(start_of(Grain::Second, now), Grain::NoGrain)),
        TimeExpr::Cycle { grain, offset } => {
            let current = TimeObject::unit(start_of(*grain, now), *grain);
            shift(current, *offset as i64, *grain)
        }
        TimeExpr::Date { year, month, day } => next_date(*year, *month, *day, today),
        TimeExpr::Lunar { year, month, day, leap } => {
            lunar::occurrence(*year, *month, *day, *leap, today).map(TimeObject::day)
        }
        TimeExpr::Weekday { weekday, week_offset } => {
            let date = match week_offset {
                None => (0..7).map(|n| today + TimeDelta::days(n)).find(|d| d.weekday() == *weekday)?,
                Some(weeks) => {
                    week_start(today)
                        + TimeDelta::try_weeks(*weeks as i64)?
                        + TimeDelta::days(weekday.num_days_from_monday() as i64)
                }
            };
            Some(TimeObject::day(date))
        }
        TimeExpr::Weekend { week_offset } => {
            let saturday = week_start(today) + TimeDelta::try_weeks(week_offset.unwrap_or(0) as i64)? + TimeDelta::days(5);
            let start = midnight(saturday);
            Some(TimeObject::range(start, start + TimeDelta::days(2), Grain::Day))
        }
        TimeExpr::TimeOfDay { .. } => {
            let start = midnight(today);
            within(expr, &TimeObject::range(start, start + TimeDelta::days(2), Grain::Day), now)
        }
        TimeExpr::PartOfDay(pod) => {
            [today, today.succ_opt()?].into_iter().map(|d| part_of_day(*pod, d)).find(|o| !o.is_over(now))
        }
        TimeExpr::Quarter { year, quarter } => {
            quarter_start(year.unwrap_or(today.year()), *quarter).map(|s| TimeObject::unit(s, Grain::Quarter))
        }
        TimeExpr::Season(season) => {
            (today.year() - 1..=today.year() + 1).filter_map(|y| season_range(*season, y)).find(|o| !o.is_over(now))
        }
        TimeExpr::Holiday(holiday) => (today.year() - 1..=today.year() + 1)
            .filter_map(|y| holiday_date(*holiday, y))
            .find(|d| *d >= today)
            .map(TimeObject::day),
        TimeExpr::Part { base, part } => period_part(&normalize(base, now)?, *part),
        TimeExpr::Shift { expr, amount, grain } => shift(normalize(expr, now)?, *amount, *grain),
        TimeExpr::Window { amount, grain, past } => window(now, *amount, *grain, *past),
        TimeExpr::Intersect { outer, inner } => within(inner, &normalize(outer, now)?, now),
        TimeExpr::Interval { start, end } => {
            let from = normalize(start, now)?;
            let to = normalize(end, from.start)?;
            interval(from, to)
        }
    }
}

/// Resolve `expr` inside `anchor`. Among the candidates inside the anchor the
/// first one not yet over wins, falling back to the first candidate.
fn within(expr: &TimeExpr, anchor: &TimeObject, now: NaiveDateTime) -> Option<TimeObject> {
    let anchor_end = anchor.end()?;
    let inside = |o: &TimeObject| o.start >= anchor.start && o.start < anchor_end;
    let pick = |candidates: Vec<TimeObject>| -> Option<TimeObject> {
        let mut inside_anchor = candidates.into_iter().filter(|o| inside(o)).peekable();
        let first = *inside_anchor.peek()?;
        Some(inside_anchor.find(|o| !o.is_over(now)).unwrap_or(first))
    };
    let days = || {
        (0..MAX_SCAN_DAYS)
            .map_while(move |n| anchor.start.date().checked_add_signed(TimeDelta::days(n)))
            .take_while(move |d| midnight(*d) < anchor_end)
    };

    match expr {
        TimeExpr::TimeOfDay { hour, minute, second, ambiguous } => {
            let grain = match (minute, second) {
                (_, Some(_)) => Grain::Second,
                (Some(_), None) => Grain::Minute,
                (None, None) => Grain::Hour,
            };
            let hours = candidate_hours(*hour, *ambiguous);
            let (minute, second) = (minute.unwrap_or(0), second.unwrap_or(0));
            let candidates = days()
                .flat_map(|d| hours.iter().filter_map(move |&h| d.and_hms_opt(h, minute, second)))
                .map(|dt| TimeObject::unit(dt, grain))
                .collect();
            pick(candidates)
        }
        TimeExpr::PartOfDay(pod) => pick(days().map(|d| part_of_day(*pod, d)).collect()),
        TimeExpr::Weekday { weekday, week_offset: None } => {
            pick(days().filter(|d| d.weekday() == *weekday).map(TimeObject::day).collect())
        }
        TimeExpr::Date { year, month, day } => {
            let year = year.unwrap_or(anchor.start.year());
            let candidates = match (month, day) {
                (Some(m), Some(d)) => NaiveDate::from_ymd_opt(year, *m, *d).map(TimeObject::day).into_iter().collect(),
                (Some(m), None) => NaiveDate::from_ymd_opt(year, *m, 1)
                    .map(|d| TimeObject::unit(midnight(d), Grain::Month))
                    .into_iter()
                    .collect(),
                (None, Some(d)) => days().filter(|date| date.day() == *d).map(TimeObject::day).collect(),
                (None, None) => NaiveDate::from_ymd_opt(year, 1, 1)
                    .map(|d| TimeObject::unit(midnight(d), Grain::Year))
                    .into_iter()
                    .collect(),
            };
            pick(candidates)
        }
        TimeExpr::Lunar { year: None, month, day, leap } => {
            let year = anchor.start.year();
            pick((year - 1..=year).filter_map(|y| lunar::to_solar(y, *month, *day, *leap)).map(TimeObject::day).collect())
        }
        TimeExpr::Holiday(holiday) => {
            let year = anchor.start.year();
            pick((year - 1..=year).filter_map(|y| holiday_date(*holiday, y)).map(TimeObject::day).collect())
        }
        TimeExpr::Season(season) => pick(season_range(*season, anchor.start.year()).into_iter().collect()),
        TimeExpr::Quarter { year: None, quarter } => pick(
            quarter_start(anchor.start.year(), *quarter).map(|s| TimeObject::unit(s, Grain::Quarter)).into_iter().collect(),
        ),
        TimeExpr::Part { base, part } => period_part(&within(base, anchor, now)?, *part),
        TimeExpr::Intersect { outer, inner } => within(inner, &within(outer, anchor, now)?, now),
        TimeExpr::Interval { start, end } => {
            let from = within(start, anchor, now)?;
            let to = normalize(end, from.start)?;
            interval(from, to)
        }
        other => normalize(other, now).filter(|o| inside(o)),
    }
}

/// Move `base` by `amount` units of `grain`.
///
/// The anchor is truncated to its own grain boundary before a finer step is
/// applied; quarter steps are counted in months from the year boundary given
/// by `reset_to`. The grain of the result is re-derived from both.
fn shift(base: TimeObject, amount: i64, grain: Grain) -> Option<TimeObject> {
    let anchor = if grain.is_finer_than(base.grain) { start_of(base.grain, base.start) } else { base.start };

    let moved = if grain == Grain::Quarter {
        let year_start = start_of(reset_to(grain), anchor);
        let months = (anchor.month0() as i64).checked_add(amount.checked_mul(3)?)?;
        let month_start = shift_datetime_by_grain(year_start, months, Grain::Month)?;
        let day = anchor.day().min(days_in_month(month_start.year(), month_start.month())?);
        NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), day)?.and_time(anchor.time())
    } else {
        shift_datetime_by_grain(anchor, amount, grain)?
    };

    let grain_out = match base.grain {
        Grain::NoGrain if grain >= Grain::Day => Grain::Day,
        Grain::NoGrain => Grain::Second,
        g => g.min(grain),
    };
    let start = start_of(grain_out, moved);
    let end = match base.end {
        Some(end) => Some(shift_datetime_by_grain(end, amount, grain)?),
        None => None,
    };
    Some(TimeObject { start, grain: grain_out, end })
}

/// 过去三天 is the three whole days before today; 未来三天 the three after it.
/// Windows finer than a day are measured from the reference instant.
fn window(now: NaiveDateTime, amount: i64, grain: Grain, past: bool) -> Option<TimeObject> {
    let origin = if grain >= Grain::Day { midnight(now.date()) } else { start_of(Grain::Second, now) };
    let (from, to) = match (past, grain >= Grain::Day) {
        (true, _) => (shift_datetime_by_grain(origin, -amount, grain)?, origin),
        (false, true) => {
            let tomorrow = origin + TimeDelta::days(1);
            (tomorrow, shift_datetime_by_grain(tomorrow, amount, grain)?)
        }
        (false, false) => (origin, shift_datetime_by_grain(origin, amount, grain)?),
    };
    Some(TimeObject::range(from, to, grain))
}

fn interval(from: TimeObject, to: TimeObject) -> Option<TimeObject> {
    let end = to.end()?;
    (end > from.start).then(|| TimeObject::range(from.start, end, from.grain.min(to.grain)))
}

fn candidate_hours(hour: u32, ambiguous: bool) -> Vec<u32> {
    let hour = hour % 24;
    if ambiguous && hour <= 12 {
        let morning = hour % 12;
        vec![morning, morning + 12]
    } else {
        vec![hour]
    }
}

fn next_date(year: Option<i32>, month: Option<u32>, day: Option<u32>, today: NaiveDate) -> Option<TimeObject> {
    let month_unit = |d: NaiveDate| TimeObject::unit(midnight(d), Grain::Month);
    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d).map(TimeObject::day),
        (Some(y), Some(m), None) => NaiveDate::from_ymd_opt(y, m, 1).map(month_unit),
        (Some(y), None, None) => NaiveDate::from_ymd_opt(y, 1, 1).map(|d| TimeObject::unit(midnight(d), Grain::Year)),
        // Eight years always include a 29 February.
        (None, Some(m), Some(d)) => (today.year()..=today.year() + 8)
            .filter_map(|y| NaiveDate::from_ymd_opt(y, m, d))
            .find(|date| *date >= today)
            .map(TimeObject::day),
        (None, Some(m), None) => {
            let year = if m >= today.month() { today.year() } else { today.year() + 1 };
            NaiveDate::from_ymd_opt(year, m, 1).map(month_unit)
        }
        (None, None, Some(d)) => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
            (0..12)
                .filter_map(|n| first.checked_add_months(Months::new(n))?.with_day(d))
                .find(|date| *date >= today)
                .map(TimeObject::day)
        }
        _ => None,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(date.weekday().num_days_from_monday() as i64)
}

fn part_of_day(pod: PartOfDay, date: NaiveDate) -> TimeObject {
    let (from, to) = match pod {
        PartOfDay::EarlyMorning => (0, 6),
        PartOfDay::Morning => (6, 12),
        PartOfDay::Forenoon => (8, 12),
        PartOfDay::Noon => (11, 14),
        PartOfDay::Afternoon => (12, 18),
        PartOfDay::Dusk => (17, 19),
        PartOfDay::Evening => (18, 24),
        PartOfDay::LateNight => (21, 24),
    };
    let day = midnight(date);
    TimeObject::range(day + TimeDelta::hours(from), day + TimeDelta::hours(to), Grain::Hour)
}

fn quarter_start(year: i32, quarter: u32) -> Option<NaiveDateTime> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1).map(midnight)
}

/// Meteorological seasons; winter runs from December into the next year.
fn season_range(season: Season, year: i32) -> Option<TimeObject> {
    let (from, to) = match season {
        Season::Spring => (NaiveDate::from_ymd_opt(year, 3, 1)?, NaiveDate::from_ymd_opt(year, 6, 1)?),
        Season::Summer => (NaiveDate::from_ymd_opt(year, 6, 1)?, NaiveDate::from_ymd_opt(year, 9, 1)?),
        Season::Autumn => (NaiveDate::from_ymd_opt(year, 9, 1)?, NaiveDate::from_ymd_opt(year, 12, 1)?),
        Season::Winter => (NaiveDate::from_ymd_opt(year, 12, 1)?, NaiveDate::from_ymd_opt(year + 1, 3, 1)?),
    };
    Some(TimeObject::range(midnight(from), midnight(to), Grain::Day))
}

/// 月初 is days 1-10, 月中 11-20 and 月底 the rest; a year splits into
/// four-month thirds. Other periods are cut into equal thirds.
fn period_part(base: &TimeObject, part: PeriodPart) -> Option<TimeObject> {
    let end = base.end()?;
    let index = match part {
        PeriodPart::Early => 0,
        PeriodPart::Mid => 1,
        PeriodPart::Late => 2,
    };
    let (bounds, grain) = match (base.grain, base.end) {
        (Grain::Month, None) => {
            let cut = |n: i64| if n == 3 { Some(end) } else { base.start.checked_add_signed(TimeDelta::days(10 * n)) };
            ((cut(index)?, cut(index + 1)?), Grain::Day)
        }
        (Grain::Year, None) => {
            let cut = |n: i64| shift_datetime_by_grain(base.start, 4 * n, Grain::Month);
            ((cut(index)?, cut(index + 1)?), Grain::Month)
        }
        _ => {
            let third = (end - base.start) / 3;
            let from = base.start + third * index as i32;
            let to = if index == 2 { end } else { from + third };
            ((from, to), finer(base.grain).unwrap_or(base.grain))
        }
    };
    Some(TimeObject::range(bounds.0, bounds.1, grain))
}

/// 清明 falls on 4 or 5 April: day = ⌊Y·0.2422 + 4.81⌋ − ⌊Y/4⌋ with Y the
/// last two digits of the year (valid 2001-2099).
fn qing_ming(year: i32) -> Option<NaiveDate> {
    let y = (year % 100) as f64;
    let day = (y * 0.2422 + 4.81).floor() - (y / 4.0).floor();
    NaiveDate::from_ymd_opt(year, 4, day as u32)
}

/// Date of `holiday` in `year`. Lunar festivals use the lunar year; 除夕 is
/// the eve of the following lunar new year.
pub(crate) fn holiday_date(holiday: Holiday, year: i32) -> Option<NaiveDate> {
    let solar = |m, d| NaiveDate::from_ymd_opt(year, m, d);
    let lunar = |m, d| lunar::to_solar(year, m, d, false);
    match holiday {
        Holiday::NewYearsDay => solar(1, 1),
        Holiday::ValentinesDay => solar(2, 14),
        Holiday::WomensDay => solar(3, 8),
        Holiday::QingMing => qing_ming(year),
        Holiday::LabourDay => solar(5, 1),
        Holiday::ChildrensDay => solar(6, 1),
        Holiday::TeachersDay => solar(9, 10),
        Holiday::NationalDay => solar(10, 1),
        Holiday::Christmas => solar(12, 25),
        Holiday::SpringFestival => lunar(1, 1),
        Holiday::LanternFestival => lunar(1, 15),
        Holiday::DragonBoat => lunar(5, 5),
        Holiday::Qixi => lunar(7, 7),
        Holiday::MidAutumn => lunar(8, 15),
        Holiday::DoubleNinth => lunar(9, 9),
        Holiday::NewYearsEve => lunar::to_solar(year + 1, 1, 1, false)?.pred_opt(),
    }
}
