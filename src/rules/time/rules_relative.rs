//! Times measured from now: 三天后, 两个小时以前, 过去三天, 最近一周.

use crate::rules::duration::{duration_data, is_duration, whole_units};
use crate::rules::regex_group;
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Dimension, Hint, Rule, Token};

/// 三天后, 两小时之前, 半年以后.
fn rule_duration_shift() -> Rule {
    rule! {
        name: "<duration> 后/前",
        pattern: [pred!(is_duration), re!(r"(以|之)?(后|後|前)")],
        deps: [Dimension::Duration],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let duration = duration_data(&tokens[0])?;
            let (amount, grain) = whole_units(duration.value, duration.grain)?;
            let amount = if regex_group(&tokens[1], 2)? == "前" { -amount } else { amount };
            Some(TimeData::new(TimeExpr::Shift { expr: Box::new(TimeExpr::Reference), amount, grain }))
        },
    }
}

/// 过去三天, 未来两周, 接下来一个月.
fn rule_window() -> Rule {
    rule! {
        name: "过去/未来 <duration>",
        pattern: [re!(r"(过去|過去|未来|未來|接下来|接下來|今后|今後)的?"), pred!(is_duration)],
        deps: [Dimension::Duration],
        hint: Hint::Recent,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let past = matches!(regex_group(&tokens[0], 1)?, "过去" | "過去");
            let duration = duration_data(&tokens[1])?;
            let (amount, grain) = whole_units(duration.value, duration.grain)?;
            Some(TimeData::new(TimeExpr::Window { amount, grain, past }))
        },
    }
}

/// 最近三天, 近一周: recency without a stated direction reads backwards.
fn rule_recent_window() -> Rule {
    rule! {
        name: "最近 <duration>",
        pattern: [re!(r"最近|近"), pred!(is_duration)],
        required_phrases: ["近"],
        deps: [Dimension::Duration],
        hint: Hint::UncertainRecent,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let duration = duration_data(&tokens[1])?;
            let (amount, grain) = whole_units(duration.value, duration.grain)?;
            Some(TimeData::new(TimeExpr::Window { amount, grain, past: true }))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_duration_shift(), rule_window(), rule_recent_window()]
}
