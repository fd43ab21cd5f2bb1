//! Words that name a time relative to now: 现在, 明天, 今晚, 下个月, 去年.

use crate::rules::regex_group;
use crate::rules::time::helpers::parse::{cycle_offset, part_of_day_from};
use crate::time_expr::{Grain, PartOfDay, TimeData, TimeExpr};
use crate::{Hint, Rule, Token};

fn rule_now() -> Rule {
    rule! {
        name: "now (现在)",
        pattern: [re!(r"现在|此刻|此时|此時|当下|當下|眼下")],
        prod: |_tokens: &[Token]| -> Option<TimeData> {
            Some(TimeData::new(TimeExpr::Reference))
        },
    }
}

/// 大前天 .. 大后天.
fn rule_nominal_day() -> Rule {
    rule! {
        name: "nominal day (今天, 明天, 后天)",
        pattern: [re!(r"(大前天|前天|昨天|昨日|今天|今日|明天|明日|大后天|大後天|后天|後天)")],
        hint: Hint::RecentNominal,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let offset = match regex_group(&tokens[0], 1)? {
                "大前天" => -3,
                "前天" => -2,
                "昨天" | "昨日" => -1,
                "今天" | "今日" => 0,
                "明天" | "明日" => 1,
                "后天" | "後天" => 2,
                "大后天" | "大後天" => 3,
                _ => return None,
            };
            Some(TimeData::new(TimeExpr::Cycle { grain: Grain::Day, offset }))
        },
    }
}

/// 今晚, 明早, 昨晚.
fn rule_fused_day_part() -> Rule {
    rule! {
        name: "fused day and part of day (今晚, 明早)",
        pattern: [re!(r"(今|明|昨)(晚|早|晨)")],
        hint: Hint::RecentNominal,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let offset = match regex_group(&tokens[0], 1)? {
                "今" => 0,
                "明" => 1,
                "昨" => -1,
                _ => return None,
            };
            let pod = match regex_group(&tokens[0], 2)? {
                "晚" => PartOfDay::Evening,
                _ => PartOfDay::Morning,
            };
            Some(TimeData::new(TimeExpr::intersect(
                TimeExpr::Cycle { grain: Grain::Day, offset },
                TimeExpr::PartOfDay(pod),
            )))
        },
    }
}

/// 下个月, 上周, 本季度, 下下周.
fn rule_cycle() -> Rule {
    rule! {
        name: "this/next/last <cycle>",
        pattern: [re!(r"(下下|上上|这|這|本|下|上)(个|個)?(年|月|季度|周|週|星期|礼拜|禮拜)")],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let offset = cycle_offset(regex_group(&tokens[0], 1)?)?;
            let grain = match regex_group(&tokens[0], 3)? {
                "年" => Grain::Year,
                "月" => Grain::Month,
                "季度" => Grain::Quarter,
                _ => Grain::Week,
            };
            Some(TimeData::new(TimeExpr::Cycle { grain, offset }))
        },
    }
}

/// 今年, 明年, 去年, 前年, 后年.
fn rule_named_year() -> Rule {
    rule! {
        name: "named year (今年, 去年)",
        pattern: [re!(r"(今|明|去|前|后|後)年")],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let offset = cycle_offset(regex_group(&tokens[0], 1)?)?;
            Some(TimeData::new(TimeExpr::Cycle { grain: Grain::Year, offset }))
        },
    }
}

fn rule_part_of_day() -> Rule {
    rule! {
        name: "part of day (上午, 晚上)",
        pattern: [re!(r"(凌晨|早上|早晨|清晨|上午|中午|下午|傍晚|晚上|晚间|晚間|夜里|夜裡|夜晚|深夜|半夜|午夜)")],
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let text = match regex_group(&tokens[0], 1)? {
                "晚間" => "晚间",
                "夜裡" => "夜里",
                other => other,
            };
            Some(TimeData::new(TimeExpr::PartOfDay(part_of_day_from(text)?)))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_now(),
        rule_nominal_day(),
        rule_fused_day_part(),
        rule_cycle(),
        rule_named_year(),
        rule_part_of_day(),
    ]
}
