use crate::engine::BucketMask;
use crate::rules::duration::{convert, duration_data, is_duration, unit_grain};
use crate::rules::numeral::predicates::is_positive;
use crate::rules::{numeral_value, regex_group};
use crate::time_expr::Grain;
use crate::{Dimension, DurationData, Rule, Token};

const UNIT: u32 = BucketMask::TIME_UNIT.bits();

// A bare `<n>月` names a month, not a span of months: only `<n>个月` counts.
fn unit_from(tokens: &[Token], classifier_group: usize, unit_group: usize) -> Option<Grain> {
    let grain = unit_grain(regex_group(&tokens[tokens.len() - 1], unit_group)?)?;
    if grain == Grain::Month && regex_group(&tokens[tokens.len() - 1], classifier_group).is_none() {
        return None;
    }
    Some(grain)
}

/// 三天, 两个小时, 10秒钟, 三个月.
fn rule_numeral_unit() -> Rule {
    rule! {
        name: "<integer> <unit-of-duration>",
        pattern: [
            pred!(is_positive),
            re!(r"(个|個)?(秒钟|秒|分钟|分鐘|小时|小時|钟头|鐘頭|天|周|星期|礼拜|禮拜|月|季度|年)")
        ],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<DurationData> {
            let value = numeral_value(&tokens[0])?;
            let grain = unit_from(tokens, 1, 2)?;
            Some(DurationData { value, grain })
        },
    }
}

/// 三个半小时, 两个半月.
fn rule_numeral_and_half_unit() -> Rule {
    rule! {
        name: "<integer> 个半 <unit-of-duration>",
        pattern: [
            pred!(is_positive),
            re!(r"(个|個)?半(秒钟|分钟|分鐘|小时|小時|钟头|鐘頭|天|星期|礼拜|禮拜|月|年)")
        ],
        required_phrases: ["半"],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<DurationData> {
            let value = numeral_value(&tokens[0])?;
            let grain = unit_from(tokens, 1, 2)?;
            Some(DurationData { value: value + 0.5, grain })
        },
    }
}

/// 一天半, 两年半.
fn rule_numeral_unit_and_half() -> Rule {
    rule! {
        name: "<integer> <unit-of-duration> 半",
        pattern: [
            pred!(is_positive),
            re!(r"(个|個)?(分钟|分鐘|小时|小時|钟头|鐘頭|天|周|星期|礼拜|禮拜|月|年)半")
        ],
        required_phrases: ["半"],
        buckets: UNIT,
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<DurationData> {
            let value = numeral_value(&tokens[0])?;
            let grain = unit_from(tokens, 1, 2)?;
            Some(DurationData { value: value + 0.5, grain })
        },
    }
}

/// 半小时, 半天, 半个月, 半年.
fn rule_half_unit() -> Rule {
    rule! {
        name: "半 <unit-of-duration>",
        pattern: [
            re!(r"半(个|個)?(分钟|分鐘|小时|小時|钟头|鐘頭|天|星期|礼拜|禮拜|月|年)")
        ],
        required_phrases: ["半"],
        buckets: UNIT,
        prod: |tokens: &[Token]| -> Option<DurationData> {
            let grain = unit_grain(regex_group(&tokens[0], 2)?)?;
            Some(DurationData { value: 0.5, grain })
        },
    }
}

fn combine(coarse: &DurationData, fine: &DurationData) -> Option<DurationData> {
    if fine.grain >= coarse.grain {
        return None;
    }
    let value = convert(coarse.value, coarse.grain, fine.grain)? + fine.value;
    Some(DurationData { value, grain: fine.grain })
}

/// 一小时二十分钟, 一年三个月: expressed in the finer unit.
fn rule_composite() -> Rule {
    rule! {
        name: "composite <duration>",
        pattern: [
            pred!(is_duration),
            pred!(is_duration)
        ],
        deps: [Dimension::Duration],
        prod: |tokens: &[Token]| -> Option<DurationData> {
            combine(duration_data(&tokens[0])?, duration_data(&tokens[1])?)
        },
    }
}

/// 一小时零五分钟.
fn rule_composite_with_zero() -> Rule {
    rule! {
        name: "composite <duration> 零 <duration>",
        pattern: [
            pred!(is_duration),
            re!(r"零"),
            pred!(is_duration)
        ],
        required_phrases: ["零"],
        deps: [Dimension::Duration],
        prod: |tokens: &[Token]| -> Option<DurationData> {
            combine(duration_data(&tokens[0])?, duration_data(&tokens[2])?)
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_numeral_unit(),
        rule_numeral_and_half_unit(),
        rule_numeral_unit_and_half(),
        rule_half_unit(),
        rule_composite(),
        rule_composite_with_zero(),
    ]
}
