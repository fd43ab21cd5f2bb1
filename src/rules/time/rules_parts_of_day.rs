//! Intersections: 明天下午, 下午三点, 周三晚上八点, 2016年的国庆节, 三点下午.

use crate::rules::time::predicates::{
    is_anchorable, is_concrete_time, is_part_of_day, is_time_of_day, scope, time_expr,
};
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Dimension, Hint, Rule, Token};

/// `outer` then `inner`, read coarse to fine.
fn intersect(tokens: &[Token]) -> Option<TimeData> {
    let outer = time_expr(tokens.first()?)?;
    let inner = time_expr(tokens.last()?)?;
    if !is_anchorable(outer) || !is_anchorable(inner) || scope(outer) <= scope(inner) {
        return None;
    }
    // Date fields combine through their own rules (2016年 + 12月 is 2016年12月).
    if matches!((outer, inner), (TimeExpr::Date { .. }, TimeExpr::Date { .. })) {
        return None;
    }
    Some(TimeData::new(TimeExpr::intersect(outer.clone(), inner.clone())))
}

/// 明天下午, 下午三点, 12月9日晚上.
fn rule_intersect() -> Rule {
    rule! {
        name: "intersect <time> <time>",
        pattern: [pred!(is_concrete_time), pred!(is_concrete_time)],
        deps: [Dimension::Time],
        hint: Hint::Intersect,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            intersect(tokens)
        },
    }
}

/// 2017年的国庆节, 下周的周末.
fn rule_intersect_de() -> Rule {
    rule! {
        name: "intersect <time> 的 <time>",
        pattern: [pred!(is_concrete_time), re!(r"的"), pred!(is_concrete_time)],
        required_phrases: ["的"],
        deps: [Dimension::Time],
        hint: Hint::Intersect,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            intersect(tokens)
        },
    }
}

/// 八点晚上, 三点下午.
fn rule_time_of_day_part_of_day() -> Rule {
    rule! {
        name: "<time-of-day> <part-of-day>",
        pattern: [pred!(is_time_of_day), pred!(is_part_of_day)],
        deps: [Dimension::Time],
        hint: Hint::PartOfDayAtLast,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let time = time_expr(&tokens[0])?.clone();
            let part = time_expr(&tokens[1])?.clone();
            Some(TimeData::new(TimeExpr::intersect(part, time)))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_intersect(), rule_intersect_de(), rule_time_of_day_part_of_day()]
}
