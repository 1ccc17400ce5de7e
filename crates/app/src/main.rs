use std::fmt;
use std::io::Read;

use chrono::NaiveDate;
use services::{AnalyticsService, Clock, StudySnapshot};

mod logging;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingSnapshot,
    InvalidDate { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingSnapshot => write!(f, "no snapshot given (--snapshot or STUDY_SNAPSHOT)"),
            ArgsError::InvalidDate { raw } => {
                write!(f, "invalid --as-of value: {raw} (expected YYYY-MM-DD)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_date(raw: String) -> Result<NaiveDate, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidDate { raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  study-report --snapshot <path|-> [--as-of <YYYY-MM-DD>] [--log-level <filter>] [--compact]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --as-of      today (local calendar day)");
    eprintln!("  --log-level  info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_SNAPSHOT, STUDY_AS_OF, STUDY_LOG");
}

struct Args {
    snapshot: String,
    as_of: Option<NaiveDate>,
    log_level: String,
    compact: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut snapshot = std::env::var("STUDY_SNAPSHOT").ok();
        let mut as_of = std::env::var("STUDY_AS_OF")
            .ok()
            .map(parse_date)
            .transpose()?;
        let mut log_level = std::env::var("STUDY_LOG").unwrap_or_else(|_| "info".into());
        let mut compact = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--snapshot" => snapshot = Some(require_value(args, "--snapshot")?),
                "--as-of" => as_of = Some(parse_date(require_value(args, "--as-of")?)?),
                "--log-level" => log_level = require_value(args, "--log-level")?,
                "--compact" => compact = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let snapshot = snapshot
            .filter(|path| !path.trim().is_empty())
            .ok_or(ArgsError::MissingSnapshot)?;
        Ok(Self {
            snapshot,
            as_of,
            log_level,
            compact,
        })
    }
}

fn read_snapshot(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    logging::init_tracing(&parsed.log_level);

    let clock = parsed.as_of.map_or_else(Clock::default_clock, Clock::fixed);
    let service = AnalyticsService::new(clock);
    tracing::info!(snapshot = %parsed.snapshot, as_of = %service.today(), "building study report");

    let raw = read_snapshot(&parsed.snapshot)
        .inspect_err(|err| tracing::error!(snapshot = %parsed.snapshot, %err, "cannot read snapshot"))?;
    let snapshot = StudySnapshot::from_json(&raw)
        .inspect_err(|err| tracing::error!(%err, "snapshot rejected"))?;

    let report = service.report(&snapshot);

    let out = if parsed.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{out}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
