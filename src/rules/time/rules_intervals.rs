//! Intervals between two times: 三点到五点, 周一至周五, 从12月1日到12月9日.

use crate::rules::time::predicates::{is_concrete_time, time_expr};
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Dimension, Hint, Rule, Token};

fn interval(from: &Token, to: &Token) -> Option<TimeData> {
    let (start, end) = (time_expr(from)?, time_expr(to)?);
    let nested = |e: &TimeExpr| matches!(e, TimeExpr::Interval { .. } | TimeExpr::Window { .. });
    if nested(start) || nested(end) {
        return None;
    }
    Some(TimeData::new(TimeExpr::Interval { start: Box::new(start.clone()), end: Box::new(end.clone()) }))
}

/// 三点到五点, 12月1日-12月9日.
fn rule_interval() -> Rule {
    rule! {
        name: "<time> 到 <time>",
        pattern: [pred!(is_concrete_time), re!(r"到|至|-|~|～|—"), pred!(is_concrete_time)],
        deps: [Dimension::Time],
        hint: Hint::Sequence,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            interval(&tokens[0], &tokens[2])
        },
    }
}

/// 从三点到五点.
fn rule_from_to() -> Rule {
    rule! {
        name: "从 <time> 到 <time>",
        pattern: [re!(r"从|從|自"), pred!(is_concrete_time), re!(r"到|至"), pred!(is_concrete_time)],
        deps: [Dimension::Time],
        hint: Hint::Sequence,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            interval(&tokens[1], &tokens[3])
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_interval(), rule_from_to()]
}
