mod debug_report;

use osmtype::{Options, OsmElement, classify_verbose_with, default_classificator};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "OSMTYPE_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_logging();

    let mut element = OsmElement::from_pairs(config.id, config.tags);
    let input = element.clone();
    let taxonomy = default_classificator();
    let res = classify_verbose_with(&mut element, taxonomy, &config.options);
    debug_report::print_run(&input, taxonomy, &res, config.color);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(io::stderr).init();
}

struct CliConfig {
    id: u64,
    tags: Vec<(String, String)>,
    options: Options,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut tags: Vec<(String, String)> = Vec::new();
    let mut id = 0;
    let mut options = Options::default();
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("osmtype {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--all-paths" => options.visibility_filter = false,
            "--no-address-fixup" => options.address_fixup = false,
            "--id" => {
                let value = args.next().ok_or_else(|| "error: --id expects a value".to_string())?;
                id = parse_id(&value)?;
            }
            "--" => {
                for rest in args.by_ref() {
                    tags.push(parse_tag(&rest)?);
                }
                break;
            }
            _ if arg.starts_with("--id=") => {
                id = parse_id(arg.trim_start_matches("--id="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => tags.push(parse_tag(&arg)?),
        }
    }

    if tags.is_empty() {
        tags = read_stdin_tags()?;
    }

    if tags.is_empty() {
        return Err(format!("error: no tags provided\n\n{}", help_text()));
    }

    Ok(CliConfig { id, tags, options, color })
}

/// Split `key=value` on the first `=`. Values may be empty; keys may not.
fn parse_tag(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("error: invalid tag '{arg}' (expected key=value)")),
    }
}

fn parse_id(value: &str) -> Result<u64, String> {
    value.parse().map_err(|_| format!("error: invalid --id '{value}' (expected an unsigned integer)"))
}

fn read_stdin_tags() -> Result<Vec<(String, String)>, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    buffer.lines().filter(|line| !line.trim().is_empty()).map(parse_tag).collect()
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "osmtype {version}

Classify one map element from its tags.

Usage:
  osmtype [OPTIONS] [--] <key=value...>
  echo 'highway=residential' | osmtype [OPTIONS]

Options:
  --id <n>                   Element id shown in the report. Default: 0
  --all-paths                Keep types the taxonomy does not draw.
  --no-address-fixup         Keep `entrance` on addressed elements.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Tags are read from stdin, one key=value per line, when none are given as
arguments. Set {log_env}=osmtype=debug to trace the engine on stderr.

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV
    )
}
