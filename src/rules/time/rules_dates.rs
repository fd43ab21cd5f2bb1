//! Calendar dates: 2016年, 12月, 9号, 2016年12月9日, 2016-12-09.

use crate::engine::BucketMask;
use crate::rules::numeral::predicates::integer_between;
use crate::rules::regex_group;
use crate::rules::time::helpers::parse::{int_in, integer_value, parse_int};
use crate::rules::time::predicates::{is_day_only, is_month_only, is_year_month, is_year_only, time_expr};
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Dimension, Hint, Rule, Token};

const DIGITS: u32 = BucketMask::HAS_DIGITS.bits();
const UNIT: u32 = BucketMask::TIME_UNIT.bits();

fn date(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> TimeData {
    TimeData::new(TimeExpr::Date { year, month, day })
}

fn date_fields(token: &Token) -> Option<(Option<i32>, Option<u32>, Option<u32>)> {
    match time_expr(token)? {
        TimeExpr::Date { year, month, day } => Some((*year, *month, *day)),
        _ => None,
    }
}

/// 2016年, 二零一六年.
fn rule_year() -> Rule {
    rule! {
        name: "year (2016年)",
        pattern: [re!(r"(\d{4}|[零〇一二三四五六七八九]{4})年")],
        buckets: UNIT,
        hint: Hint::YearOnly,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let year = parse_int(regex_group(&tokens[0], 1)?)?;
            Some(date(Some(i32::try_from(year).ok()?), None, None))
        },
    }
}

/// A bare four-digit number that looks like a year.
fn rule_latent_year() -> Rule {
    rule! {
        name: "year (latent)",
        pattern: [re!(r"(?-u:\b)((?:19|20)\d{2})(?-u:\b)")],
        buckets: DIGITS,
        hint: Hint::YearOnly,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let year = regex_group(&tokens[0], 1)?.parse().ok()?;
            Some(TimeData::latent(TimeExpr::Date { year: Some(year), month: None, day: None }))
        },
    }
}

/// 三月, 12月.
fn rule_month() -> Rule {
    rule! {
        name: "month (三月)",
        pattern: [pred!(integer_between::<1, 13>), re!(r"月份|月")],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        hint: Hint::MonthOnly,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let month = u32::try_from(integer_value(&tokens[0])?).ok()?;
            Some(date(None, Some(month), None))
        },
    }
}

/// 9号, 二十三日.
fn rule_day() -> Rule {
    rule! {
        name: "day of month (9号)",
        pattern: [pred!(integer_between::<1, 32>), re!(r"日|号|號")],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        hint: Hint::DayOnly,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let day = u32::try_from(integer_value(&tokens[0])?).ok()?;
            Some(date(None, None, Some(day)))
        },
    }
}

fn rule_year_month() -> Rule {
    rule! {
        name: "<year> <month>",
        pattern: [pred!(is_year_only), pred!(is_month_only)],
        deps: [Dimension::Time],
        hint: Hint::YearMonth,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let (year, _, _) = date_fields(&tokens[0])?;
            let (_, month, _) = date_fields(&tokens[1])?;
            Some(date(year, month, None))
        },
    }
}

fn rule_month_day() -> Rule {
    rule! {
        name: "<month> <day>",
        pattern: [pred!(is_month_only), pred!(is_day_only)],
        deps: [Dimension::Time],
        hint: Hint::MonthDay,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let (_, month, _) = date_fields(&tokens[0])?;
            let (_, _, day) = date_fields(&tokens[1])?;
            Some(date(None, month, day))
        },
    }
}

fn rule_year_month_day() -> Rule {
    rule! {
        name: "<year-month> <day>",
        pattern: [pred!(is_year_month), pred!(is_day_only)],
        deps: [Dimension::Time],
        hint: Hint::Date,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let (year, month, _) = date_fields(&tokens[0])?;
            let (_, _, day) = date_fields(&tokens[1])?;
            Some(date(year, month, day))
        },
    }
}

/// 2016-12-09, 2016/12/9, 2016.12.09.
fn rule_numeric_date() -> Rule {
    rule! {
        name: "yyyy-mm-dd",
        pattern: [re!(r"(?-u:\b)(\d{4})([-/.])(\d{1,2})([-/.])(\d{1,2})(?-u:\b)")],
        buckets: DIGITS,
        hint: Hint::Date,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            // Mixed separators (2016-12/09) are not dates.
            if regex_group(&tokens[0], 2)? != regex_group(&tokens[0], 4)? {
                return None;
            }
            let year = regex_group(&tokens[0], 1)?.parse().ok()?;
            let month = int_in(regex_group(&tokens[0], 3)?, 1, 12)?;
            let day = int_in(regex_group(&tokens[0], 5)?, 1, 31)?;
            Some(date(Some(year), Some(month), Some(day)))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_year(),
        rule_latent_year(),
        rule_month(),
        rule_day(),
        rule_year_month(),
        rule_month_day(),
        rule_year_month_day(),
        rule_numeric_date(),
    ]
}
