use chrono::{DateTime, FixedOffset, TimeZone};

use crate::time_expr::Grain;
use crate::{Context, Dimension, Locale, Options, ResolvedValue, TimeValue, analyze};

fn offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

// Thursday 2016-12-08 11:30:30 in Beijing.
fn context() -> Context {
    Context::new(offset().with_ymd_and_hms(2016, 12, 8, 11, 30, 30).unwrap(), Locale::ZhCn)
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn instant(value: DateTime<FixedOffset>, grain: Grain) -> TimeValue {
    TimeValue::Instant { value, grain }
}

fn day(y: i32, m: u32, d: u32) -> TimeValue {
    instant(at(y, m, d, 0, 0, 0), Grain::Day)
}

fn interval(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>, grain: Grain) -> TimeValue {
    TimeValue::Interval { from, to, grain }
}

fn times_with(input: &str, options: &Options) -> Vec<(String, TimeValue)> {
    analyze(input, &context(), options)
        .unwrap()
        .into_iter()
        .filter_map(|a| match a.value {
            ResolvedValue::Time(value) => Some((a.text, value)),
            _ => None,
        })
        .collect()
}

fn times(input: &str) -> Vec<(String, TimeValue)> {
    times_with(input, &Options::only([Dimension::Time]))
}

#[test]
fn time_examples() {
    let cases = [
        ("明天下午三点", instant(at(2016, 12, 9, 15, 0, 0), Grain::Hour)),
        ("现在", instant(at(2016, 12, 8, 11, 30, 30), Grain::Second)),
        ("今天", day(2016, 12, 8)),
        ("后天", day(2016, 12, 10)),
        ("大前天", day(2016, 12, 5)),
        ("下个月", instant(at(2017, 1, 1, 0, 0, 0), Grain::Month)),
        ("去年", instant(at(2015, 1, 1, 0, 0, 0), Grain::Year)),
        ("2016年12月9日", day(2016, 12, 9)),
        ("12月9号", day(2016, 12, 9)),
        ("2016-12-09", day(2016, 12, 9)),
        ("下周三", day(2016, 12, 14)),
        ("星期天", day(2016, 12, 11)),
        ("三点半", instant(at(2016, 12, 8, 15, 30, 0), Grain::Minute)),
        ("15:30", instant(at(2016, 12, 8, 15, 30, 0), Grain::Minute)),
        ("晚上八点", instant(at(2016, 12, 8, 20, 0, 0), Grain::Hour)),
        ("三天后", day(2016, 12, 11)),
        ("两个小时后", instant(at(2016, 12, 8, 13, 30, 30), Grain::Second)),
        ("国庆节", day(2017, 10, 1)),
        ("中秋节", day(2017, 10, 4)),
        ("除夕", day(2017, 1, 27)),
        ("2017年中秋节", day(2017, 10, 4)),
        ("农历八月十五", day(2017, 10, 4)),
        ("三月初五", day(2017, 4, 1)),
        ("阴历闰四月初一", day(2020, 5, 23)),
        ("第一季度", instant(at(2016, 1, 1, 0, 0, 0), Grain::Quarter)),
    ];

    for (input, expected) in cases {
        assert_eq!(times(input), vec![(input.to_string(), expected)], "{input}");
    }
}

#[test]
fn interval_examples() {
    let cases = [
        ("周末", interval(at(2016, 12, 10, 0, 0, 0), at(2016, 12, 12, 0, 0, 0), Grain::Day)),
        ("今晚", interval(at(2016, 12, 8, 18, 0, 0), at(2016, 12, 9, 0, 0, 0), Grain::Hour)),
        ("过去三天", interval(at(2016, 12, 5, 0, 0, 0), at(2016, 12, 8, 0, 0, 0), Grain::Day)),
        ("月底", interval(at(2016, 12, 21, 0, 0, 0), at(2017, 1, 1, 0, 0, 0), Grain::Day)),
        ("三点到五点", interval(at(2016, 12, 8, 15, 0, 0), at(2016, 12, 8, 18, 0, 0), Grain::Hour)),
        ("从12月10日到12月15日", interval(at(2016, 12, 10, 0, 0, 0), at(2016, 12, 16, 0, 0, 0), Grain::Day)),
        ("夏天", interval(at(2017, 6, 1, 0, 0, 0), at(2017, 9, 1, 0, 0, 0), Grain::Day)),
    ];

    for (input, expected) in cases {
        assert_eq!(times(input), vec![(input.to_string(), expected)], "{input}");
    }
}

#[test]
fn time_inside_a_sentence() {
    let found = times("我们明天下午三点在公司见");
    assert_eq!(found, vec![("明天下午三点".to_string(), instant(at(2016, 12, 9, 15, 0, 0), Grain::Hour))]);
}

#[test]
fn bare_year_is_latent() {
    assert!(times("2016").is_empty());
    let found = times_with("2016", &Options::only([Dimension::Time]).with_latent(true));
    assert_eq!(found, vec![("2016".to_string(), instant(at(2016, 1, 1, 0, 0, 0), Grain::Year))]);
}

#[test]
fn bare_lunar_day_is_never_emitted() {
    assert!(times("初五").is_empty());
}

#[test]
fn impossible_dates_are_dropped() {
    assert!(times("2月30日").iter().all(|(text, _)| text != "2月30日"));
}

#[test]
fn decimal_is_not_a_clock_time() {
    let found = analyze("三点五", &context(), &Options::all()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].dim, Dimension::Numeral);
}

#[test]
fn huge_shifts_resolve_to_nothing() {
    for input in ["99999999999999999999个月后", "99999999999999999999年前", "过去99999999999999999999天"] {
        assert!(times(input).iter().all(|(text, _)| text != input), "{input}");
    }
}

#[test]
fn clock_times_with_optional_seconds() {
    let cases = [
        ("15:30:20", instant(at(2016, 12, 8, 15, 30, 20), Grain::Second)),
        ("2016-12-09 15:30", instant(at(2016, 12, 9, 15, 30, 0), Grain::Minute)),
        ("2016-12-09 15:30:20", instant(at(2016, 12, 9, 15, 30, 20), Grain::Second)),
    ];
    for (input, expected) in cases {
        assert_eq!(times(input), vec![(input.to_string(), expected)], "{input}");
    }
    assert!(times("15:30:75").iter().all(|(text, _)| text != "15:30:75"));
}
