//! Parts of the calendar: 第一季度, 月初, 年底, 下个月中旬, 今年夏天.

use crate::rules::regex_group;
use crate::rules::time::helpers::parse::{int_in, period_part_from, season_from};
use crate::rules::time::predicates::{is_divisible, part_of, time_expr};
use crate::time_expr::{Grain, TimeData, TimeExpr};
use crate::{Dimension, Hint, Rule, Token};

fn is_divisible_time(token: &Token) -> bool {
    time_expr(token).is_some_and(is_divisible)
}

/// 第一季度, 三季度.
fn rule_quarter() -> Rule {
    rule! {
        name: "quarter (第一季度)",
        pattern: [re!(r"第?([一二三四1-4])季度")],
        required_phrases: ["季"],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let quarter = int_in(regex_group(&tokens[0], 1)?, 1, 4)?;
            Some(TimeData::new(TimeExpr::Quarter { year: None, quarter }))
        },
    }
}

/// 月初, 月底, 年中: the current month or year.
fn rule_current_period_part() -> Rule {
    rule! {
        name: "月初 / 年底",
        pattern: [re!(r"(月|年)(上旬|中旬|下旬|初|中|底|末)")],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let grain = if regex_group(&tokens[0], 1)? == "年" { Grain::Year } else { Grain::Month };
            let part = period_part_from(regex_group(&tokens[0], 2)?)?;
            Some(TimeData::new(part_of(TimeExpr::Cycle { grain, offset: 0 }, part)))
        },
    }
}

/// 下个月初, 2016年底, 三月中旬, 本季度末.
fn rule_period_part() -> Rule {
    rule! {
        name: "<period> 初/中/底",
        pattern: [pred!(is_divisible_time), re!(r"(上旬|中旬|下旬|初|中|底|末)")],
        deps: [Dimension::Time],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let base = time_expr(&tokens[0])?.clone();
            let part = period_part_from(regex_group(&tokens[1], 1)?)?;
            Some(TimeData::new(part_of(base, part)))
        },
    }
}

fn rule_season() -> Rule {
    rule! {
        name: "season (夏天)",
        pattern: [re!(r"(春|夏|秋|冬)(天|季)")],
        hint: Hint::Season,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let season = season_from(regex_group(&tokens[0], 1)?)?;
            Some(TimeData::new(TimeExpr::Season(season)))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_quarter(), rule_current_period_part(), rule_period_part(), rule_season()]
}
