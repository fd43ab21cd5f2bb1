//! Weekday rules: 周三, 星期天, 下周一, 这个礼拜五, 周末.

use crate::rules::regex_group;
use crate::rules::time::helpers::parse::{cycle_offset, weekday_from};
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Rule, Token};

// Week modifier: None for a bare weekday, which means the next occurrence.
fn week_offset(token: &Token) -> Option<Option<i32>> {
    match regex_group(token, 1) {
        Some(modifier) => Some(Some(cycle_offset(modifier)?)),
        None => Some(None),
    }
}

/// "<weekday>", "下周<weekday>", "上个星期<weekday>"
fn rule_weekday() -> Rule {
    rule! {
        name: "<weekday>",
        pattern: [
            re!(r"(下下|上上|这|這|本|下|上)?(?:个|個)?(?:周|週|星期|礼拜|禮拜)([一二三四五六日天1-7])")
        ],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let week_offset = week_offset(&tokens[0])?;
            let weekday = weekday_from(regex_group(&tokens[0], 2)?)?;
            Some(TimeData::new(TimeExpr::Weekday { weekday, week_offset }))
        },
    }
}

/// "周末", "下个周末"
fn rule_weekend() -> Rule {
    rule! {
        name: "weekend (周末)",
        pattern: [re!(r"(下下|上上|这|這|本|下|上)?(?:个|個)?(?:周末|週末)")],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let week_offset = week_offset(&tokens[0])?;
            Some(TimeData::new(TimeExpr::Weekend { week_offset }))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_weekday(), rule_weekend()]
}
