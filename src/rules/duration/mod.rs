//! Durations: 三个半小时, 两天, 半个月, 一小时二十分钟.

pub mod rules;

#[cfg(test)]
mod tests;

use crate::time_expr::Grain;
use crate::{Context, DurationData, Hint, Options, ResolvedValue, Rule, Token, TokenKind};

pub fn rules() -> Vec<Rule> {
    rules::get()
}

pub fn resolve(token: &Token, _hint: Hint, _context: &Context, _options: &Options) -> Option<(ResolvedValue, bool)> {
    match &token.kind {
        TokenKind::Duration(dd) if dd.value.is_finite() => Some((
            ResolvedValue::Duration { value: dd.value, grain: dd.grain, seconds: dd.value * dd.grain.seconds() as f64 },
            false,
        )),
        _ => None,
    }
}

pub fn is_duration(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Duration(_))
}

pub(crate) fn duration_data(t: &Token) -> Option<&DurationData> {
    match &t.kind {
        TokenKind::Duration(dd) => Some(dd),
        _ => None,
    }
}

/// Grain named by a Chinese duration unit.
pub(crate) fn unit_grain(unit: &str) -> Option<Grain> {
    let grain = match unit {
        "秒" | "秒钟" => Grain::Second,
        "分钟" | "分鐘" => Grain::Minute,
        "小时" | "小時" | "钟头" | "鐘頭" => Grain::Hour,
        "天" | "日" => Grain::Day,
        "周" | "星期" | "礼拜" | "禮拜" => Grain::Week,
        "月" => Grain::Month,
        "季度" => Grain::Quarter,
        "年" => Grain::Year,
        _ => return None,
    };
    Some(grain)
}

// Calendar-exact split of one unit into the next unit down.
fn split_unit(grain: Grain) -> Option<(Grain, f64)> {
    match grain {
        Grain::Year => Some((Grain::Month, 12.0)),
        Grain::Quarter => Some((Grain::Month, 3.0)),
        Grain::Month => Some((Grain::Day, 30.0)),
        Grain::Week => Some((Grain::Day, 7.0)),
        Grain::Day => Some((Grain::Hour, 24.0)),
        Grain::Hour => Some((Grain::Minute, 60.0)),
        Grain::Minute => Some((Grain::Second, 60.0)),
        Grain::Second | Grain::NoGrain => None,
    }
}

/// Express `value` units of `grain` in `target` units, walking down the
/// calendar chain. `None` when `target` is not below `grain`.
pub(crate) fn convert(value: f64, grain: Grain, target: Grain) -> Option<f64> {
    let (mut value, mut grain) = (value, grain);
    while grain != target {
        let (next, factor) = split_unit(grain)?;
        value *= factor;
        grain = next;
    }
    Some(value)
}

/// Whole number of units equal to `value` × `grain`, moving to a finer grain
/// until the amount is integral (半年 is 6 months, 1.5 hours is 90 minutes).
pub(crate) fn whole_units(value: f64, grain: Grain) -> Option<(i64, Grain)> {
    let (mut value, mut grain) = (value, grain);
    loop {
        if !value.is_finite() || value.abs() >= i64::MAX as f64 {
            return None;
        }
        if (value - value.round()).abs() < 1e-9 {
            return Some((value.round() as i64, grain));
        }
        let (next, factor) = split_unit(grain)?;
        value *= factor;
        grain = next;
    }
}
