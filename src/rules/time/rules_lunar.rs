//! Lunar calendar dates: 农历八月十五, 正月初一, 腊月二十三, 三月初五, 大年初二.
//!
//! A bare 初五 is kept as a lunar day with month 0. It never resolves on its
//! own and only serves to build 三月初五.

use crate::rules::regex_group;
use crate::rules::time::helpers::parse::{lunar_day_from, lunar_month_from, parse_int};
use crate::rules::time::predicates::{is_month_only, time_expr};
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Dimension, Hint, Rule, Token};

fn lunar(year: Option<i32>, month: u32, day: u32, leap: bool) -> TimeData {
    TimeData::new(TimeExpr::Lunar { year, month, day, leap })
}

fn is_lunar_day(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::Lunar { month: 0, .. }))
}

/// 农历八月十五, 阴历2017年闰六月初三.
fn rule_lunar_date() -> Rule {
    rule! {
        name: "农历 <month> <day>",
        pattern: [
            re!(r"(?:农历|農曆|阴历|陰曆)\s*(?:(\d{4}|[零〇一二三四五六七八九]{4})年)?\s*(闰|閏)?(正|元|冬|腊|臘|十[一二]?|[一二三四五六七八九]|1[0-2]|[1-9])月\s*(初[一二三四五六七八九十]|廿[一二三四五六七八九]|二十[一二三四五六七八九]?|三十|十[一二三四五六七八九]?|[一二三四五六七八九]|[12]\d|30|[1-9])(?:日|号|號)?")
        ],
        optional_phrases: ["农历", "農曆", "阴历", "陰曆"],
        hint: Hint::Lunar,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let year = match regex_group(&tokens[0], 1) {
                Some(text) => Some(i32::try_from(parse_int(text)?).ok()?),
                None => None,
            };
            let leap = regex_group(&tokens[0], 2).is_some();
            let month = lunar_month_from(regex_group(&tokens[0], 3)?)?;
            let day = lunar_day_from(regex_group(&tokens[0], 4)?)?;
            Some(lunar(year, month, day, leap))
        },
    }
}

/// 正月十五, 腊月二十三, 冬月初一.
fn rule_named_month() -> Rule {
    rule! {
        name: "<lunar month name> <day>",
        pattern: [
            re!(r"(正|冬|腊|臘)月\s*(初[一二三四五六七八九十]|廿[一二三四五六七八九]|二十[一二三四五六七八九]?|三十|十[一二三四五六七八九]?|[一二三四五六七八九])")
        ],
        hint: Hint::Lunar,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let month = lunar_month_from(regex_group(&tokens[0], 1)?)?;
            let day = lunar_day_from(regex_group(&tokens[0], 2)?)?;
            Some(lunar(None, month, day, false))
        },
    }
}

/// 大年初二.
fn rule_new_year_days() -> Rule {
    rule! {
        name: "大年初<day>",
        pattern: [re!(r"大年(初[一二三四五六七八九十])")],
        hint: Hint::Lunar,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let day = lunar_day_from(regex_group(&tokens[0], 1)?)?;
            Some(lunar(None, 1, day, false))
        },
    }
}

fn rule_bare_lunar_day() -> Rule {
    rule! {
        name: "初<day>",
        pattern: [re!(r"初[一二三四五六七八九十]")],
        hint: Hint::ComposeNeeded,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let day = lunar_day_from(regex_group(&tokens[0], 0)?)?;
            Some(lunar(None, 0, day, false))
        },
    }
}

/// 三月初五: a month followed by a lunar day reads as a lunar date.
fn rule_month_lunar_day() -> Rule {
    rule! {
        name: "<month> 初<day>",
        pattern: [pred!(is_month_only), pred!(is_lunar_day)],
        deps: [Dimension::Time],
        hint: Hint::Lunar,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let month = match time_expr(&tokens[0])? {
                TimeExpr::Date { month: Some(month), .. } => *month,
                _ => return None,
            };
            let day = match time_expr(&tokens[1])? {
                TimeExpr::Lunar { day, .. } => *day,
                _ => return None,
            };
            Some(lunar(None, month, day, false))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_lunar_date(),
        rule_named_month(),
        rule_new_year_days(),
        rule_bare_lunar_day(),
        rule_month_lunar_day(),
    ]
}
