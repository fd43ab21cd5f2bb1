//! Parsing utilities for the calendar words captured by time rules.

use chrono::Weekday;

use crate::rules::numeral::helpers::{parse_decimal, parse_han_integer};
use crate::time_expr::{Holiday, PartOfDay, PeriodPart, Season};
use crate::{Token, TokenKind};

/// Integral value of a numeral token.
pub fn integer_value(token: &Token) -> Option<i64> {
    match &token.kind {
        TokenKind::Numeral(nd) if nd.value.fract().abs() < f64::EPSILON => Some(nd.value as i64),
        _ => None,
    }
}

/// Integer written with Arabic (half- or full-width) or Chinese digits.
pub fn parse_int(text: &str) -> Option<i64> {
    if text.chars().all(|c| c.is_ascii_digit() || ('０'..='９').contains(&c)) {
        let value = parse_decimal(text)?;
        return (value.fract() == 0.0).then_some(value as i64);
    }
    parse_han_integer(text)
}

/// `parse_int` restricted to `[min, max]`.
pub fn int_in(text: &str, min: i64, max: i64) -> Option<u32> {
    parse_int(text).filter(|v| (min..=max).contains(v)).map(|v| v as u32)
}

pub fn weekday_from(text: &str) -> Option<Weekday> {
    let weekday = match text {
        "一" | "1" => Weekday::Mon,
        "二" | "2" => Weekday::Tue,
        "三" | "3" => Weekday::Wed,
        "四" | "4" => Weekday::Thu,
        "五" | "5" => Weekday::Fri,
        "六" | "6" => Weekday::Sat,
        "日" | "天" | "7" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Cycle offset named by a 这/下/上 style modifier. `None` for unknown words.
pub fn cycle_offset(modifier: &str) -> Option<i32> {
    let offset = match modifier {
        "这" | "這" | "本" | "今" => 0,
        "下" | "明" => 1,
        "上" | "去" | "昨" => -1,
        "下下" | "后" | "後" => 2,
        "上上" | "前" => -2,
        _ => return None,
    };
    Some(offset)
}

pub fn part_of_day_from(text: &str) -> Option<PartOfDay> {
    let pod = match text {
        "凌晨" => PartOfDay::EarlyMorning,
        "早上" | "早晨" | "清晨" | "早" | "晨" => PartOfDay::Morning,
        "上午" => PartOfDay::Forenoon,
        "中午" => PartOfDay::Noon,
        "下午" => PartOfDay::Afternoon,
        "傍晚" => PartOfDay::Dusk,
        "晚上" | "晚间" | "夜里" | "夜晚" | "晚" => PartOfDay::Evening,
        "深夜" | "半夜" | "午夜" => PartOfDay::LateNight,
        _ => return None,
    };
    Some(pod)
}

pub fn period_part_from(text: &str) -> Option<PeriodPart> {
    let part = match text {
        "初" | "上旬" => PeriodPart::Early,
        "中" | "中旬" => PeriodPart::Mid,
        "底" | "末" | "下旬" => PeriodPart::Late,
        _ => return None,
    };
    Some(part)
}

pub fn season_from(text: &str) -> Option<Season> {
    let season = match text.chars().next()? {
        '春' => Season::Spring,
        '夏' => Season::Summer,
        '秋' => Season::Autumn,
        '冬' => Season::Winter,
        _ => return None,
    };
    Some(season)
}

pub fn holiday_from(text: &str) -> Option<Holiday> {
    let holiday = match text.trim_end_matches('节') {
        "元旦" => Holiday::NewYearsDay,
        "情人" => Holiday::ValentinesDay,
        "妇女" | "三八妇女" | "三八" => Holiday::WomensDay,
        "清明" => Holiday::QingMing,
        "劳动" | "五一劳动" | "五一" => Holiday::LabourDay,
        "儿童" | "六一儿童" | "六一" => Holiday::ChildrensDay,
        "教师" => Holiday::TeachersDay,
        "国庆" => Holiday::NationalDay,
        "圣诞" => Holiday::Christmas,
        "春" | "大年初一" => Holiday::SpringFestival,
        "元宵" => Holiday::LanternFestival,
        "端午" => Holiday::DragonBoat,
        "七夕" => Holiday::Qixi,
        "中秋" => Holiday::MidAutumn,
        "重阳" => Holiday::DoubleNinth,
        "除夕" | "大年三十" | "年三十" => Holiday::NewYearsEve,
        _ => return None,
    };
    Some(holiday)
}

/// Lunar month name: 正月 is 1, 冬月 11, 腊月 12.
pub fn lunar_month_from(text: &str) -> Option<u32> {
    match text {
        "正" | "元" => Some(1),
        "冬" => Some(11),
        "腊" | "臘" => Some(12),
        other => int_in(other, 1, 12),
    }
}

/// Lunar day name: 初一..初十, 十一..十九, 二十/廿x, 三十.
pub fn lunar_day_from(text: &str) -> Option<u32> {
    if let Some(rest) = text.strip_prefix('初') {
        return int_in(rest, 1, 10);
    }
    if let Some(rest) = text.strip_prefix('廿') {
        return int_in(rest, 1, 9).map(|d| 20 + d);
    }
    int_in(text, 1, 30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_accepts_both_scripts() {
        assert_eq!(parse_int("2016"), Some(2016));
        assert_eq!(parse_int("二零一六"), Some(2016));
        assert_eq!(parse_int("十二"), Some(12));
        assert_eq!(parse_int("１５"), Some(15));
        assert_eq!(int_in("十三", 1, 12), None);
    }

    #[test]
    fn lunar_names() {
        assert_eq!(lunar_month_from("正"), Some(1));
        assert_eq!(lunar_month_from("腊"), Some(12));
        assert_eq!(lunar_month_from("八"), Some(8));
        assert_eq!(lunar_day_from("初五"), Some(5));
        assert_eq!(lunar_day_from("十五"), Some(15));
        assert_eq!(lunar_day_from("廿三"), Some(23));
        assert_eq!(lunar_day_from("二十三"), Some(23));
        assert_eq!(lunar_day_from("初十一"), None);
    }

    #[test]
    fn holiday_names_with_and_without_suffix() {
        assert_eq!(holiday_from("中秋节"), Some(Holiday::MidAutumn));
        assert_eq!(holiday_from("中秋"), Some(Holiday::MidAutumn));
        assert_eq!(holiday_from("春节"), Some(Holiday::SpringFestival));
        assert_eq!(holiday_from("国庆节"), Some(Holiday::NationalDay));
        assert_eq!(holiday_from("大年三十"), Some(Holiday::NewYearsEve));
    }

    #[test]
    fn modifiers_map_to_offsets() {
        assert_eq!(cycle_offset("下下"), Some(2));
        assert_eq!(cycle_offset("去"), Some(-1));
        assert_eq!(cycle_offset("这"), Some(0));
        assert_eq!(cycle_offset("昨"), Some(-1));
    }
}
