use crate::rules::numeral;
use crate::{Context, Dimension, Locale, Options, ResolvedValue, RuleRegistry, analyze_with};

fn registry() -> RuleRegistry {
    RuleRegistry::from_rules(Locale::ZhCn, vec![(Dimension::Numeral, numeral::rules())])
}

#[test]
fn numeral_examples_matching() {
    // Array of (expected_value, input_string)
    let cases: Vec<(f64, &str)> = vec![
        (0.0, "0"),
        (0.0, "零"),
        (1.0, "1"),
        (1.0, "一"),
        (2.0, "两"),
        (2.0, "二"),
        (3.0, "３"),
        (10.0, "十"),
        (12.0, "十二"),
        (12.0, "12"),
        (20.0, "二十"),
        (33.0, "三十三"),
        (33.0, "0033"),
        (105.0, "一百零五"),
        (120.0, "壹佰贰拾"),
        (3500.0, "三千五"),
        (3005.0, "三千零五"),
        (23000.0, "两万三"),
        (100000.0, "十万"),
        (100000.0, "100,000"),
        (100000.0, "10万"),
        (120000000.0, "一亿二千万"),
        (150000000.0, "1.5亿"),
        (30000000.0, "3千万"),
        (5000.0, "5k"),
        (2016.0, "二零一六"),
        (1.1, "1.1"),
        (3.5, "三点五"),
        (0.25, "零点二五"),
        (-504.0, "-504"),
        (-3.0, "负三"),
        (-1.5, "负1.5"),
        (0.2, "1/5"),
        (0.25, "四分之一"),
        (0.2, "百分之二十"),
        (0.2, "20%"),
    ];

    let registry = registry();
    let ctx = Context::default();
    let opts = Options::only([Dimension::Numeral]);

    for (expected, input) in cases {
        let answers = analyze_with(&registry, input, &ctx, &opts).unwrap();

        let matched = answers.iter().any(|a| {
            a.text == input && matches!(a.value, ResolvedValue::Numeral { value } if (value - expected).abs() < 1e-9)
        });

        assert!(matched, "No rule produced expected numeral {} for input '{}' (answers: {:#?})", expected, input, answers);
    }
}

#[test]
fn numerals_inside_text_are_found_separately() {
    let answers = analyze_with(&registry(), "买了三个，花了25", &Context::default(), &Options::only([Dimension::Numeral])).unwrap();
    let values: Vec<_> = answers.iter().map(|a| (a.text.as_str(), a.value.clone())).collect();
    assert_eq!(
        values,
        vec![("三", ResolvedValue::Numeral { value: 3.0 }), ("25", ResolvedValue::Numeral { value: 25.0 })]
    );
}

#[test]
fn malformed_han_runs_do_not_produce_numerals() {
    let answers = analyze_with(&registry(), "万", &Context::default(), &Options::only([Dimension::Numeral])).unwrap();
    assert!(answers.is_empty());
}
