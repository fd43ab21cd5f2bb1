mod debug_report;

use chrono::NaiveDateTime;
use mingri::{Context, Locale, Options, analyze_verbose};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_OFFSET_HOURS: i32 = 8;
const LOG_ENV: &str = "MINGRI_LOG";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let context = match build_context(&config) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let options = match Options::from_names(&config.dims.iter().map(String::as_str).collect::<Vec<_>>()) {
        Ok(options) => options.with_latent(config.latent),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let res = match analyze_verbose(&config.input, &context, &options) {
        Ok(res) => res,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&res.answers) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to encode answers: {err}");
                std::process::exit(1);
            }
        }
    } else {
        debug_report::print_run(&config.input, &context, &res, config.color);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer().with_writer(io::stderr)).init();
}

struct CliConfig {
    input: String,
    reference: Option<NaiveDateTime>,
    offset_hours: i32,
    locale: Locale,
    dims: Vec<String>,
    latent: bool,
    json: bool,
    color: bool,
}

fn build_context(config: &CliConfig) -> mingri::Result<Context> {
    let reference = match config.reference {
        Some(reference) => reference,
        None => chrono::Utc::now().naive_utc() + chrono::TimeDelta::hours(i64::from(config.offset_hours)),
    };
    let mut context = Context::at(reference, config.offset_hours)?;
    context.locale = config.locale;
    Ok(context)
}

/// Fetch the value of a flag given either as `--flag value` or `--flag=value`.
fn flag_value(
    flag: &str,
    inline: Option<&str>,
    args: &mut impl Iterator<Item = String>,
) -> Result<String, String> {
    match inline {
        Some(value) => Ok(value.to_string()),
        None => args.next().ok_or_else(|| format!("error: {flag} expects a value")),
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut config = CliConfig {
        input: String::new(),
        reference: None,
        offset_hours: DEFAULT_OFFSET_HOURS,
        locale: Locale::ZhCn,
        dims: Vec::new(),
        latent: false,
        json: false,
        color: io::stdout().is_terminal(),
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let inline = inline.as_deref();

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("mingri {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => config.color = true,
            "--no-color" => config.color = false,
            "--json" => config.json = true,
            "--latent" => config.latent = true,
            "--reference" => {
                let value = flag_value("--reference", inline, &mut args)?;
                config.reference = Some(parse_reference(&value)?);
            }
            "--offset" => {
                let value = flag_value("--offset", inline, &mut args)?;
                config.offset_hours = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("error: invalid --offset '{value}' (expected whole hours, e.g. 8 or -5)"))?;
            }
            "--locale" => {
                let value = flag_value("--locale", inline, &mut args)?;
                config.locale = value.parse().map_err(|err| format!("error: {err}"))?;
            }
            "--dims" => {
                let value = flag_value("--dims", inline, &mut args)?;
                config.dims.extend(value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from));
            }
            "--input" | "-i" => {
                let value = flag_value("--input", inline, &mut args)?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.by_ref().collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args.by_ref()).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    config.input = input;
    Ok(config)
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("error: invalid --reference '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "mingri {version}

Extract times, durations, recurrences, numerals, money, quantities, speeds,
temperatures, ages, phone numbers and digit strings from Chinese text.

Usage:
  mingri [OPTIONS] [--] <input...>
  mingri [OPTIONS] --input <text>

Options:
  -i, --input <text>         Input text to analyze. If omitted, reads remaining args
                             or stdin when no args are provided.
  --reference <timestamp>    Reference wall-clock time in YYYY-MM-DDTHH:MM:SS.
                             Default: now.
  --offset <hours>           UTC offset of the reference, in hours. Default: {offset}
  --dims <a,b,...>           Dimensions to extract (time, duration, numeral, ...).
                             Default: all.
  --latent                   Keep latent results such as a bare year.
  --locale <tag>             Rule locale. Default: zh_CN
  --json                     Print answers as JSON instead of the debug report.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                  Log filter (tracing EnvFilter syntax). Default: warn

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        offset = DEFAULT_OFFSET_HOURS,
        log_env = LOG_ENV,
    )
}
