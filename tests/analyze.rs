use chrono::{FixedOffset, TimeZone};
use mingri::{
    Answer, Context, Dimension, Error, Grain, Locale, Options, ResolvedValue, RuleRegistry, TimeValue, analyze,
    analyze_with, finer, reset_to,
};

const SENTENCES: &[&str] = &[
    "我们明天下午三点在公司见",
    "下周三上午十点开会，预计两个小时",
    "从12月10日到12月15日出差，预算三千五百元",
    "2016年的冬天气温零下五度",
    "请在三天后拨打13812345678",
    "农历八月十五中秋节晚上八点半",
    "过去三天跑了五公里",
    "第一季度的销售额增长了百分之二十",
];

fn context() -> Context {
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    Context::new(offset.with_ymd_and_hms(2016, 12, 8, 11, 30, 30).unwrap(), Locale::ZhCn)
}

fn run(text: &str, options: &Options) -> Vec<Answer> {
    analyze(text, &context(), options).unwrap()
}

#[test]
fn analysis_is_deterministic() {
    for text in SENTENCES {
        let first = run(text, &Options::all());
        for _ in 0..3 {
            assert_eq!(run(text, &Options::all()), first, "{text}");
        }
    }
}

#[test]
fn answers_never_overlap() {
    for text in SENTENCES {
        let answers = run(text, &Options::all());
        for (i, a) in answers.iter().enumerate() {
            for b in &answers[i + 1..] {
                assert!(!a.span.overlaps(&b.span), "{text}: {:?} overlaps {:?}", a.text, b.text);
            }
        }
    }
}

#[test]
fn no_answer_is_subsumed_by_another() {
    for text in SENTENCES {
        let answers = run(text, &Options::all());
        for a in &answers {
            for b in &answers {
                if a.span != b.span {
                    assert!(!b.span.contains(&a.span), "{text}: {:?} inside {:?}", a.text, b.text);
                }
            }
        }
    }
}

#[test]
fn answers_are_in_text_order() {
    for text in SENTENCES {
        let answers = run(text, &Options::all());
        assert!(answers.windows(2).all(|w| w[0].span.start <= w[1].span.start), "{text}");
    }
}

#[test]
fn empty_input_yields_nothing() {
    assert_eq!(run("", &Options::all()), Vec::new());
    assert_eq!(run(" \t\n", &Options::only([Dimension::Time])), Vec::new());
}

#[test]
fn numeral_filter_only_returns_numerals() {
    let numerals = Options::only([Dimension::Numeral]);
    for text in SENTENCES {
        let answers = run(text, &numerals);
        assert!(answers.iter().all(|a| a.dim == Dimension::Numeral), "{text}: {answers:?}");
    }
}

#[test]
fn latent_answers_are_suppressed_by_default() {
    for text in SENTENCES.iter().copied().chain(["2016", "1998年以前"]) {
        assert!(run(text, &Options::all()).iter().all(|a| !a.latent), "{text}");
    }

    let with_latent = run("2016", &Options::only([Dimension::Time]).with_latent(true));
    assert_eq!(with_latent.len(), 1);
    assert!(with_latent[0].latent);
}

#[test]
fn grains_step_finer_and_reset_is_idempotent() {
    let all = [
        Grain::NoGrain,
        Grain::Second,
        Grain::Minute,
        Grain::Hour,
        Grain::Day,
        Grain::Week,
        Grain::Month,
        Grain::Quarter,
        Grain::Year,
    ];
    for grain in all {
        if let Some(next) = finer(grain) {
            assert!(next < grain, "{grain:?} -> {next:?}");
        }
        assert_eq!(reset_to(reset_to(grain)), reset_to(grain), "{grain:?}");
    }
    assert_eq!(reset_to(Grain::Quarter), Grain::Year);
}

#[test]
fn tomorrow_afternoon_at_three() {
    let answers = run("明天下午三点", &Options::only([Dimension::Time]));
    assert_eq!(answers.len(), 1);
    let ResolvedValue::Time(TimeValue::Instant { value, grain }) = &answers[0].value else {
        panic!("expected an instant, got {:?}", answers[0].value);
    };
    assert_eq!(value.to_rfc3339(), "2016-12-09T15:00:00+08:00");
    assert_eq!(*grain, Grain::Hour);
}

#[test]
fn three_and_a_half_hours_is_one_duration() {
    let answers = run("三个半小时", &Options::only([Dimension::Duration]));
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].text, "三个半小时");
    assert_eq!(answers[0].value, ResolvedValue::Duration { value: 3.5, grain: Grain::Hour, seconds: 12_600.0 });
}

#[test]
fn nothing_to_find_is_empty() {
    assert_eq!(run("你好", &Options::only([Dimension::Currency])), Vec::new());
}

#[test]
fn callers_can_build_a_smaller_registry() {
    let registry = RuleRegistry::for_dimensions(Locale::ZhCn, [Dimension::Currency]);
    let answers = analyze_with(&registry, "三块五", &context(), &Options::only([Dimension::Currency])).unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].value, ResolvedValue::Currency { value: 3.5, unit: "CNY".to_string() });

    let err = analyze_with(&registry, "明天", &context(), &Options::only([Dimension::Time])).unwrap_err();
    assert_eq!(err, Error::DimensionNotRegistered(Dimension::Time));
}

#[test]
fn recurrences_ages_and_speeds() {
    let answers = run("我每周一跑步，三十岁了，时速十公里", &Options::all());
    let dims: Vec<Dimension> = answers.iter().map(|a| a.dim).collect();
    assert_eq!(dims, vec![Dimension::Repeat, Dimension::Age, Dimension::Velocity], "{answers:?}");
    assert_eq!(answers[1].value, ResolvedValue::Age { value: 30.0 });
    assert_eq!(answers[2].value, ResolvedValue::Velocity { value: 10.0, unit: "km/h".to_string() });
}

#[test]
fn answers_serialize_to_json() {
    let answers = run("明天下午三点", &Options::only([Dimension::Time]));
    let json = serde_json::to_value(&answers).unwrap();
    assert_eq!(json[0]["text"], "明天下午三点");
    assert_eq!(json[0]["span"]["start"], 0);
    assert_eq!(json[0]["span"]["end"], 6);
    assert_eq!(json[0]["dim"], "time");
    assert_eq!(json[0]["value"]["type"], "time");
    assert_eq!(json[0]["value"]["kind"], "instant");
    assert_eq!(json[0]["value"]["grain"], "hour");
    assert_eq!(json[0]["value"]["value"], "2016-12-09T15:00:00+08:00");
}
