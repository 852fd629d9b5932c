//! sales-forecast
//!
//! Reads a JSON array of `{"ds", "y"}` records, writes a JSON array of seven
//! `{"date", "forecast"}` rows. Diagnostics go to stderr only.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use sales_forecast::output::ResultFormatter;
use sales_forecast::{ForecastPipeline, PipelineConfig};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Seven-day sales forecast for one item's daily history
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(long, env = "SALES_FORECAST_INPUT")]
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(long, env = "SALES_FORECAST_OUTPUT")]
    output: Option<PathBuf>,

    /// Date treated as today, YYYY-MM-DD (defaults to the local date)
    #[arg(long, env = "SALES_FORECAST_TODAY")]
    today: Option<NaiveDate>,

    /// Number of days to forecast
    #[arg(long, env = "SALES_FORECAST_HORIZON", default_value = "7")]
    horizon: usize,

    /// Histories shorter than this use the recent-average fallback
    #[arg(long, env = "SALES_FORECAST_MIN_HISTORY", default_value = "30")]
    min_history: usize,

    /// Diagnostic output format
    #[arg(long, env = "SALES_FORECAST_LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Silence the seasonal model's internal logging
    #[arg(long, env = "SALES_FORECAST_QUIET_MODEL")]
    quiet_model: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat, quiet_model: bool) -> Result<()> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sales_forecast=info"));
    if quiet_model {
        filter = filter.add_directive(
            "sales_forecast::models=off"
                .parse()
                .context("invalid model log directive")?,
        );
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!(e))
    .context("failed to initialise logging")
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let config = PipelineConfig::new()
        .with_horizon(args.horizon)
        .with_min_history(args.min_history);

    let input = read_input(args.input.as_ref())?;
    let outcome = ForecastPipeline::new(config)
        .run_str(&input, today)
        .context("forecast failed")?;
    info!(rows = outcome.horizon(), path = ?outcome.path, "forecast complete");

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            ResultFormatter::write(file, &outcome.points)
        }
        None => ResultFormatter::write(std::io::stdout().lock(), &outcome.points),
    }
    .context("failed to write forecast")
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_tracing(args.log_format, args.quiet_model) {
        eprintln!("{:#}", err);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
