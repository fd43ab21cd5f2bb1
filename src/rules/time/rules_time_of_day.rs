//! Clock times: 三点, 15点30分, 三点半, 三点一刻, 差五分三点, 15:30:20.

use crate::engine::BucketMask;
use crate::rules::numeral::predicates::integer_between;
use crate::rules::regex_group;
use crate::rules::time::helpers::parse::{int_in, integer_value};
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Dimension, Hint, Rule, Token};

const UNIT: u32 = BucketMask::TIME_UNIT.bits();
const COLON: u32 = BucketMask::HAS_COLON.bits();

/// 0 and 13..=24 name one half of the day; 1..=12 may mean either.
fn clock(hour: u32, minute: Option<u32>, second: Option<u32>) -> Option<TimeData> {
    if hour > 24 {
        return None;
    }
    let hour = hour % 24;
    let ambiguous = (1..=12).contains(&hour);
    Some(TimeData::new(TimeExpr::TimeOfDay { hour, minute, second, ambiguous }))
}

fn hour_of(token: &Token) -> Option<u32> {
    u32::try_from(integer_value(token)?).ok()
}

/// 三点, 15点, 八点钟.
fn rule_hour() -> Rule {
    rule! {
        name: "<hour> 点",
        pattern: [pred!(integer_between::<0, 25>), re!(r"(?:点|點|时|時)(?:钟|鐘|整)?")],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            clock(hour_of(&tokens[0])?, None, None)
        },
    }
}

/// 三点二十, 15点30分, 三点零五分.
fn rule_hour_minute() -> Rule {
    rule! {
        name: "<hour> 点 <minute>",
        pattern: [
            pred!(integer_between::<0, 25>),
            re!(r"(?:点|點|时|時)\s*(\d{1,2}|[零〇一二三四五六七八九十]{1,3})(分钟|分鐘|分)?")
        ],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let text = regex_group(&tokens[1], 1)?;
            // 三点五 is a decimal, 三点五分 and 三点零五 are times.
            let single = text.chars().count() == 1 && text != "十";
            if single && regex_group(&tokens[1], 2).is_none() {
                return None;
            }
            let minute = int_in(text, 0, 59)?;
            clock(hour_of(&tokens[0])?, Some(minute), None)
        },
    }
}

/// 三点半, 三点一刻, 三点三刻.
fn rule_hour_fraction() -> Rule {
    rule! {
        name: "<hour> 点半 / 一刻",
        pattern: [pred!(integer_between::<0, 25>), re!(r"(?:点|點|时|時)\s*(半|一刻|1刻|三刻|3刻)")],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let minute = match regex_group(&tokens[1], 1)? {
                "半" => 30,
                "一刻" | "1刻" => 15,
                _ => 45,
            };
            clock(hour_of(&tokens[0])?, Some(minute), None)
        },
    }
}

/// 差五分三点, 三点差一刻.
fn rule_minutes_to() -> Rule {
    rule! {
        name: "差 <minutes> <hour>",
        pattern: [
            re!(r"差\s*(\d{1,2}|[一二三四五六七八九十]{1,3}|一刻)(?:分钟|分鐘|分)?\s*(\d{1,2}|[零一二两三四五六七八九十]{1,3})(?:点|點)|(\d{1,2}|[零一二两三四五六七八九十]{1,3})(?:点|點)\s*差\s*(\d{1,2}|[一二三四五六七八九十]{1,3}|一刻)(?:分钟|分鐘|分)?")
        ],
        required_phrases: ["差"],
        buckets: UNIT,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let (minutes, hour) = match regex_group(&tokens[0], 1) {
                Some(minutes) => (minutes, regex_group(&tokens[0], 2)?),
                None => (regex_group(&tokens[0], 4)?, regex_group(&tokens[0], 3)?),
            };
            let minutes = if minutes == "一刻" { 15 } else { int_in(minutes, 1, 59)? };
            let hour = int_in(hour, 1, 24)?;
            clock(hour - 1, Some(60 - minutes), None)
        },
    }
}

/// 15:30, 8:05:20, 15：30.
fn rule_colon() -> Rule {
    rule! {
        name: "hh:mm(:ss)",
        pattern: [re!(r"(?-u:\b)(\d{1,2})[:：]([0-5]\d)(?:[:：]([0-5]\d))?(?-u:\b)")],
        buckets: COLON,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let hour_text = regex_group(&tokens[0], 1)?;
            let hour = int_in(hour_text, 0, 24)?;
            let minute = int_in(regex_group(&tokens[0], 2)?, 0, 59)?;
            let second = match regex_group(&tokens[0], 3) {
                Some(s) => Some(int_in(s, 0, 59)?),
                None => None,
            };
            let mut td = clock(hour, Some(minute), second)?;
            // 08:00 is written out in full and means the morning.
            if hour_text.starts_with('0') {
                if let TimeExpr::TimeOfDay { ambiguous, .. } = &mut td.expr {
                    *ambiguous = false;
                }
            }
            Some(td)
        },
    }
}

/// 2016-12-09 15:30, 2016/12/9 8:00:00.
fn rule_date_time() -> Rule {
    rule! {
        name: "yyyy-mm-dd hh:mm(:ss)",
        pattern: [
            re!(r"(?-u:\b)(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:\s+|[tT])(\d{1,2})[:：]([0-5]\d)(?:[:：]([0-5]\d))?(?-u:\b)")
        ],
        buckets: COLON,
        hint: Hint::FinalRule,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let group = |idx| regex_group(&tokens[0], idx);
            let date = TimeExpr::Date {
                year: Some(group(1)?.parse().ok()?),
                month: Some(int_in(group(2)?, 1, 12)?),
                day: Some(int_in(group(3)?, 1, 31)?),
            };
            let second = match group(6) {
                Some(s) => Some(int_in(s, 0, 59)?),
                None => None,
            };
            let time = TimeExpr::TimeOfDay {
                hour: int_in(group(4)?, 0, 23)?,
                minute: Some(int_in(group(5)?, 0, 59)?),
                second,
                ambiguous: false,
            };
            Some(TimeData::new(TimeExpr::intersect(date, time)))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_hour(),
        rule_hour_minute(),
        rule_hour_fraction(),
        rule_minutes_to(),
        rule_colon(),
        rule_date_time(),
    ]
}
