//! Recurrences: 每天, 每周一, 每隔三天, 每月5号, 每天晚上八点.
//!
//! A repeat is a step (a count of some grain) plus an optional anchor time.
//! The anchor is resolved like any other time, which gives the first
//! occurrence at or after the reference.

use crate::rules::duration::{duration_data, is_duration, unit_grain};
use crate::rules::regex_group;
use crate::rules::time::predicates::{grain_scope, is_anchorable, is_concrete_time, scope, time_data, time_expr};
use crate::time_expr::{Grain, TimeData, TimeExpr};
use crate::{Context, Dimension, DurationData, Hint, Options, RepeatData, ResolvedValue, Rule, Token, TokenKind};

fn repeat_data(token: &Token) -> Option<&RepeatData> {
    match &token.kind {
        TokenKind::Repeat(rd) => Some(rd),
        _ => None,
    }
}

fn is_repeat(token: &Token) -> bool {
    repeat_data(token).is_some()
}

/// 周三 with no week modifier; 每下周三 means nothing.
fn is_bare_weekday(token: &Token) -> bool {
    matches!(time_expr(token), Some(TimeExpr::Weekday { week_offset: None, .. }))
}

/// 每天, 每个月, 每一年.
fn rule_every_unit() -> Rule {
    rule! {
        name: "每 <unit>",
        pattern: [
            re!(r"每(?:一)?(?:个|個)?(秒钟|秒|分钟|分鐘|小时|小時|钟头|鐘頭|天|日|周|星期|礼拜|禮拜|月|季度|年)")
        ],
        required_phrases: ["每"],
        prod: |tokens: &[Token]| -> Option<RepeatData> {
            let grain = unit_grain(regex_group(&tokens[0], 1)?)?;
            Some(RepeatData { every: DurationData { value: 1.0, grain }, anchor: None })
        },
    }
}

/// 每两周, 每隔三天, 每半小时.
fn rule_every_duration() -> Rule {
    rule! {
        name: "每(隔) <duration>",
        pattern: [re!(r"每隔|每"), pred!(is_duration)],
        required_phrases: ["每"],
        deps: [Dimension::Duration],
        prod: |tokens: &[Token]| -> Option<RepeatData> {
            let every = duration_data(&tokens[1])?;
            if !(every.value.is_finite() && every.value > 0.0) {
                return None;
            }
            Some(RepeatData { every: every.clone(), anchor: None })
        },
    }
}

/// 每周一, 每个星期五: weekly, first on the next such day.
fn rule_every_weekday() -> Rule {
    rule! {
        name: "每 <weekday>",
        pattern: [re!(r"每(?:个|個)?"), pred!(is_bare_weekday)],
        required_phrases: ["每"],
        deps: [Dimension::Time],
        prod: |tokens: &[Token]| -> Option<RepeatData> {
            let anchor = time_data(&tokens[1])?.clone();
            Some(RepeatData { every: DurationData { value: 1.0, grain: Grain::Week }, anchor: Some(anchor) })
        },
    }
}

/// 每天晚上八点, 每月5号, 每周一上午十点.
///
/// The time must be finer than the step; an anchor already present is
/// narrowed by it.
fn rule_repeat_at_time() -> Rule {
    rule! {
        name: "<repeat> <time>",
        pattern: [pred!(is_repeat), pred!(is_concrete_time)],
        deps: [Dimension::Repeat, Dimension::Time],
        prod: |tokens: &[Token]| -> Option<RepeatData> {
            let repeat = repeat_data(&tokens[0])?;
            let time = time_expr(&tokens[1])?;
            if !is_anchorable(time) || scope(time) >= grain_scope(repeat.every.grain) {
                return None;
            }
            let anchor = match &repeat.anchor {
                None => time.clone(),
                Some(outer) if scope(&outer.expr) > scope(time) => TimeExpr::intersect(outer.expr.clone(), time.clone()),
                Some(_) => return None,
            };
            Some(RepeatData { every: repeat.every.clone(), anchor: Some(TimeData::new(anchor)) })
        },
    }
}

pub fn rules() -> Vec<Rule> {
    vec![rule_every_unit(), rule_every_duration(), rule_every_weekday(), rule_repeat_at_time()]
}

/// An anchor that does not resolve drops the whole repeat.
pub fn resolve(token: &Token, _hint: Hint, context: &Context, options: &Options) -> Option<(ResolvedValue, bool)> {
    let repeat = repeat_data(token)?;
    let start = match &repeat.anchor {
        Some(anchor) => {
            let anchor = Token { kind: TokenKind::Time(anchor.clone()) };
            // Solar expressions pass through solarizing unchanged.
            match crate::rules::time::resolve(&anchor, Hint::Lunar, context, options)? {
                (ResolvedValue::Time(value), _) => Some(value),
                _ => return None,
            }
        }
        None => None,
    };
    Some((ResolvedValue::Repeat { value: repeat.every.value, grain: repeat.every.grain, start }, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TimeValue, analyze};
    use chrono::{FixedOffset, TimeZone};

    fn context() -> Context {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        Context::new(offset.with_ymd_and_hms(2016, 12, 8, 11, 30, 30).unwrap(), crate::Locale::ZhCn)
    }

    fn repeats(input: &str) -> Vec<(String, ResolvedValue)> {
        analyze(input, &context(), &Options::only([Dimension::Repeat]))
            .unwrap()
            .into_iter()
            .map(|a| (a.text, a.value))
            .collect()
    }

    fn every(value: f64, grain: Grain) -> ResolvedValue {
        ResolvedValue::Repeat { value, grain, start: None }
    }

    #[test]
    fn plain_steps() {
        let cases = [
            ("每天", every(1.0, Grain::Day)),
            ("每个月", every(1.0, Grain::Month)),
            ("每隔三天", every(3.0, Grain::Day)),
            ("每两周", every(2.0, Grain::Week)),
            ("每半小时", every(0.5, Grain::Hour)),
        ];
        for (input, expected) in cases {
            assert_eq!(repeats(input), vec![(input.to_string(), expected)], "{input}");
        }
    }

    #[test]
    fn weekday_repeats_start_on_the_next_such_day() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let expected = ResolvedValue::Repeat {
            value: 1.0,
            grain: Grain::Week,
            start: Some(TimeValue::Instant { value: offset.with_ymd_and_hms(2016, 12, 12, 0, 0, 0).unwrap(), grain: Grain::Day }),
        };
        assert_eq!(repeats("每周一"), vec![("每周一".to_string(), expected)]);
    }

    #[test]
    fn daily_repeat_at_a_clock_time() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let expected = ResolvedValue::Repeat {
            value: 1.0,
            grain: Grain::Day,
            start: Some(TimeValue::Instant { value: offset.with_ymd_and_hms(2016, 12, 8, 20, 0, 0).unwrap(), grain: Grain::Hour }),
        };
        assert_eq!(repeats("我每天晚上八点跑步"), vec![("每天晚上八点".to_string(), expected)]);
    }

    #[test]
    fn yearly_lunar_anchor_is_solarized() {
        let answers = repeats("每年农历八月十五");
        assert_eq!(answers.len(), 1);
        let ResolvedValue::Repeat { grain: Grain::Year, start: Some(TimeValue::Instant { value, .. }), .. } = &answers[0].1
        else {
            panic!("expected a yearly repeat with a start, got {:?}", answers[0].1);
        };
        // 中秋 2017 falls on October 4th.
        assert_eq!(value.date_naive().to_string(), "2017-10-04");
    }

    #[test]
    fn anchor_must_be_finer_than_the_step() {
        // 每天 cannot be pinned to a month; only the step survives.
        assert_eq!(repeats("每天十二月"), vec![("每天".to_string(), every(1.0, Grain::Day))]);
    }

    #[test]
    fn without_every_there_is_no_repeat() {
        assert!(repeats("三天").is_empty());
        assert!(repeats("周一").is_empty());
    }
}
