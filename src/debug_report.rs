use mingri::{Answer, AnalyzeDetails, Context, NodeSummary, ResolvedValue, TimeValue, VerboseAnalysis};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, context: &Context, res: &VerboseAnalysis, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Analyzing: \"{}\"", input.trim()), ansi::CYAN)));
    println!(
        "  {} {}  {} {}",
        palette.dim("reference:"),
        palette.paint(context.reference.to_rfc3339(), ansi::YELLOW),
        palette.dim("locale:"),
        palette.paint(context.locale.tag(), ansi::BLUE)
    );

    println!("\n{}", palette.paint("━━━ Saturation ━━━", ansi::GRAY));
    print_saturation(details, &palette);

    println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
    if details.all_candidates.is_empty() {
        println!("{}", palette.dim("  No candidates resolved"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Rules were filtered out (check bucket/phrase requirements)");
        println!("  • Regex patterns didn't match");
        println!("  • Productions or resolution returned nothing");
        println!("\n{}", palette.dim("  Tip: set MINGRI_LOG=mingri=trace to see rule activity"));
    } else {
        print_answers(&details.all_candidates, &palette);
    }

    println!("\n{}", palette.paint("━━━ Answers ━━━", ansi::GRAY));
    if res.answers.is_empty() {
        println!("{}", palette.dim("  (none)"));
    } else {
        print_answers(&res.answers, &palette);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Saturation: {}  │  Resolve: {}  │  Rules: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.saturation_total), ansi::CYAN),
        palette.dim(format!("{:?}", details.resolve)),
        palette.dim(details.active_rules.len().to_string()),
    );
    println!();
}

fn print_saturation(details: &AnalyzeDetails, palette: &ansi::Palette) {
    for pass in &details.saturation {
        let label = if pass.pass == 0 { "Pass 0 (regex):".to_string() } else { format!("Pass {}:", pass.pass) };

        println!(
            "  {} {} {}",
            palette.paint(label, ansi::BLUE),
            if pass.produced > 0 {
                palette.paint(format!("✓ {} nodes", pass.produced), ansi::GREEN)
            } else {
                palette.dim(format!("✗ {} nodes", pass.produced))
            },
            palette.dim(format!(
                "({} rules, {} seeded, {:?})",
                pass.rules_considered, pass.rules_seeded, pass.duration
            )),
        );

        for node in pass.samples.iter().take(5) {
            println!("    {}", fmt_node_compact(node, palette));
        }
        if pass.samples.len() > 5 {
            println!("    {}", palette.dim(format!("... +{} more", pass.samples.len() - 5)));
        }
    }
}

fn print_answers(answers: &[Answer], palette: &ansi::Palette) {
    for (idx, answer) in answers.iter().enumerate() {
        println!(
            "  {} {} {} {}{}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(&answer.text, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("span {}..{}", answer.span.start, answer.span.end), ansi::YELLOW),
            if answer.latent { palette.dim(" (latent)") } else { String::new() },
        );
        println!(
            "      {} {}  {} {}  {} {}",
            palette.dim("dim:"),
            palette.paint(answer.dim.name(), ansi::BLUE),
            palette.dim("│ rule:"),
            palette.paint(&answer.rule, ansi::CYAN),
            palette.dim("│ value:"),
            fmt_value(&answer.value),
        );
    }
}

fn fmt_value(value: &ResolvedValue) -> String {
    match value {
        ResolvedValue::Numeral { value } => value.to_string(),
        ResolvedValue::Ordinal { value } => format!("#{value}"),
        ResolvedValue::Time(TimeValue::Instant { value, grain }) => format!("{} ({})", value.to_rfc3339(), grain.name()),
        ResolvedValue::Time(TimeValue::Interval { from, to, grain }) => {
            format!("[{}, {}) ({})", from.to_rfc3339(), to.to_rfc3339(), grain.name())
        }
        ResolvedValue::Duration { value, grain, seconds } => format!("{value} {} ({seconds}s)", grain.name()),
        ResolvedValue::Currency { value, unit } => format!("{value} {unit}"),
        ResolvedValue::Quantity { value, unit, measure } => format!("{value} {unit} ({measure})"),
        ResolvedValue::Temperature { value, unit } => format!("{value}{unit}"),
        ResolvedValue::PhoneNumber { value } => value.clone(),
        ResolvedValue::Repeat { value, grain, start } => match start {
            Some(start) => format!("every {value} {} from {}", grain.name(), fmt_value(&ResolvedValue::Time(start.clone()))),
            None => format!("every {value} {}", grain.name()),
        },
        ResolvedValue::Age { value } => format!("{value} years"),
        ResolvedValue::Velocity { value, unit } => format!("{value} {unit}"),
        ResolvedValue::DigitSequence { value } => value.clone(),
    }
}

fn fmt_node_compact(node: &NodeSummary, palette: &ansi::Palette) -> String {
    format!(
        "{} {} {}",
        palette.paint(format!("{}..{}", node.span.start, node.span.end), ansi::YELLOW),
        palette.paint(&node.rule, ansi::BLUE),
        palette.dim(node.preview.clone())
    )
}
