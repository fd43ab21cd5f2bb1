//! Named holidays, solar (国庆节, 圣诞节) and lunar (春节, 中秋节, 除夕).

use crate::rules::regex_group;
use crate::rules::time::helpers::parse::holiday_from;
use crate::time_expr::{TimeData, TimeExpr};
use crate::{Hint, Rule, Token};

fn rule_holiday() -> Rule {
    rule! {
        name: "holiday",
        pattern: [
            re!(r"(元旦节?|情人节|情人節|三八妇女节|妇女节|婦女節|三八节|清明节|清明節|清明|五一劳动节|劳动节|勞動節|五一节|六一儿童节|儿童节|兒童節|六一节|教师节|教師節|国庆节|國慶節|国庆|國慶|圣诞节|聖誕節|圣诞|聖誕|春节|春節|元宵节|元宵節|元宵|端午节|端午節|端午|七夕节|七夕|中秋节|中秋節|中秋|重阳节|重陽節|重阳|除夕|大年三十|年三十)")
        ],
        hint: Hint::Holiday,
        prod: |tokens: &[Token]| -> Option<TimeData> {
            let name: String = regex_group(&tokens[0], 1)?
                .chars()
                .map(|c| match c {
                    '節' => '节',
                    '婦' => '妇',
                    '勞' => '劳',
                    '動' => '动',
                    '兒' => '儿',
                    '師' => '师',
                    '國' => '国',
                    '慶' => '庆',
                    '聖' => '圣',
                    '誕' => '诞',
                    '陽' => '阳',
                    other => other,
                })
                .collect();
            Some(TimeData::new(TimeExpr::Holiday(holiday_from(&name)?)))
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_holiday()]
}
