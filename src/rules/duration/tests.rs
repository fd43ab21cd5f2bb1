use crate::rules::duration::{self, convert, whole_units};
use crate::rules::numeral;
use crate::time_expr::Grain;
use crate::{Context, Dimension, Locale, Options, ResolvedValue, RuleRegistry, analyze_with};

fn registry() -> RuleRegistry {
    RuleRegistry::from_rules(
        Locale::ZhCn,
        vec![(Dimension::Duration, duration::rules()), (Dimension::Numeral, numeral::rules())],
    )
}

fn durations(input: &str) -> Vec<(String, ResolvedValue)> {
    analyze_with(&registry(), input, &Context::default(), &Options::only([Dimension::Duration]))
        .unwrap()
        .into_iter()
        .map(|a| (a.text, a.value))
        .collect()
}

fn duration(value: f64, grain: Grain) -> ResolvedValue {
    ResolvedValue::Duration { value, grain, seconds: value * grain.seconds() as f64 }
}

#[test]
fn duration_examples() {
    let cases = [
        ("三个半小时", duration(3.5, Grain::Hour)),
        ("两天", duration(2.0, Grain::Day)),
        ("10秒钟", duration(10.0, Grain::Second)),
        ("半小时", duration(0.5, Grain::Hour)),
        ("半个月", duration(0.5, Grain::Month)),
        ("一天半", duration(1.5, Grain::Day)),
        ("两年半", duration(2.5, Grain::Year)),
        ("三个月", duration(3.0, Grain::Month)),
        ("两个星期", duration(2.0, Grain::Week)),
        ("1.5小时", duration(1.5, Grain::Hour)),
        ("三个钟头", duration(3.0, Grain::Hour)),
        ("一小时二十分钟", duration(80.0, Grain::Minute)),
        ("一年三个月", duration(15.0, Grain::Month)),
    ];

    for (input, expected) in cases {
        let found = durations(input);
        assert_eq!(found, vec![(input.to_string(), expected)], "{input}");
    }
}

#[test]
fn three_and_a_half_hours_in_seconds() {
    let found = durations("三个半小时");
    assert_eq!(found[0].1, ResolvedValue::Duration { value: 3.5, grain: Grain::Hour, seconds: 12_600.0 });
}

#[test]
fn bare_month_number_is_not_a_duration() {
    assert!(durations("3月").is_empty());
}

#[test]
fn durations_inside_sentences() {
    let found = durations("我等了两个小时，又走了半天");
    assert_eq!(
        found,
        vec![("两个小时".to_string(), duration(2.0, Grain::Hour)), ("半天".to_string(), duration(0.5, Grain::Day))]
    );
}

#[test]
fn whole_units_moves_to_finer_grains() {
    assert_eq!(whole_units(3.0, Grain::Day), Some((3, Grain::Day)));
    assert_eq!(whole_units(0.5, Grain::Year), Some((6, Grain::Month)));
    assert_eq!(whole_units(1.5, Grain::Hour), Some((90, Grain::Minute)));
    assert_eq!(whole_units(0.5, Grain::Week), Some((84, Grain::Hour)));
    assert_eq!(whole_units(0.5, Grain::Second), None);
}

#[test]
fn whole_units_rejects_amounts_beyond_i64() {
    assert_eq!(whole_units(1e20, Grain::Month), None);
    assert_eq!(whole_units(-1e20, Grain::Day), None);
    assert_eq!(whole_units(f64::INFINITY, Grain::Day), None);
}

#[test]
fn convert_only_walks_down() {
    assert_eq!(convert(1.0, Grain::Week, Grain::Day), Some(7.0));
    assert_eq!(convert(2.0, Grain::Year, Grain::Day), Some(720.0));
    assert_eq!(convert(1.0, Grain::Day, Grain::Week), None);
}
