//! Watchdeck CLI — run the screener pipeline or preview one symbol.
//!
//! Commands:
//! - `run` — execute the full pipeline from a TOML config and replace the
//!   destination tables (Google Sheets, or CSV artifacts with `--offline`)
//! - `fetch` — fetch one symbol and print the tail of its indicator table

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use watchdeck_core::data::{BarProvider, RetryPolicy, YahooProvider};
use watchdeck_core::domain::SymbolSeries;
use watchdeck_core::indicators::{compute_table, IndicatorConfig};
use watchdeck_core::universe::{NoReference, ReferenceLookup, Universe};
use watchdeck_runner::config::{Mode, RunConfig};
use watchdeck_runner::pipeline::run_pipeline;
use watchdeck_runner::sink::{CsvSink, SheetsSink, TableSink};

#[derive(Parser)]
#[command(
    name = "watchdeck",
    about = "Daily indicator screener that publishes watchlists to spreadsheet tabs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the full pipeline from a TOML config file.
    Run {
        /// Path to the run configuration.
        #[arg(long, default_value = "watchdeck.toml")]
        config: PathBuf,

        /// Write CSV artifacts instead of the spreadsheet.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Output directory for offline CSV artifacts.
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Fetch one symbol and print the tail of its indicator table.
    Fetch {
        /// Symbol to fetch, exactly as the provider expects it (e.g. 2330.TW).
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to one year ago.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Number of trailing rows to print.
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Run {
            config,
            offline,
            out_dir,
        } => cmd_run(&config, offline, &out_dir),
        Commands::Fetch {
            symbol,
            start,
            end,
            tail,
        } => cmd_fetch(&symbol, start, end, tail),
    }
}

fn cmd_run(config_path: &PathBuf, offline: bool, out_dir: &PathBuf) -> Result<()> {
    let mut config = RunConfig::from_file(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    // MODE=prod in the environment overrides the config file, the way the
    // scheduled job selects its destination set.
    if let Ok(mode) = std::env::var("MODE") {
        match mode.parse::<Mode>() {
            Ok(parsed) => config.mode = parsed,
            Err(e) => warn!("ignoring MODE environment variable: {e}"),
        }
    }

    // A universe file supplies symbols (when none are inline) and the
    // symbol → name/category reference data.
    let universe = match &config.universe_file {
        Some(path) => Some(
            Universe::from_file(path)
                .with_context(|| format!("loading universe {}", path.display()))?,
        ),
        None => None,
    };
    if let Some(universe) = &universe {
        if config.symbols.is_empty() {
            config.symbols = universe.symbols.clone();
        }
    }
    let lookup: &dyn ReferenceLookup = match &universe {
        Some(universe) => universe,
        None => &NoReference,
    };

    let provider = YahooProvider::new(config.retry)?;
    let sink: Box<dyn TableSink> = if offline {
        Box::new(CsvSink::new(out_dir)?)
    } else {
        Box::new(SheetsSink::from_env(&config.spreadsheet_id)?)
    };

    let report = run_pipeline(&config, &provider, lookup, sink.as_ref(), Utc::now())?;

    println!(
        "done: {} symbols in, {} skipped, {} universe rows, {} tables replaced",
        report.symbols_processed,
        report.symbols_skipped.len(),
        report.universe_rows,
        report.tables_written.len()
    );
    for (symbol, reason) in &report.symbols_skipped {
        println!("  skipped {symbol}: {reason}");
    }
    println!("{}", report.freshness_marker);
    Ok(())
}

fn cmd_fetch(
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    tail: usize,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let start = start.unwrap_or(today - chrono::Duration::days(365));
    let end = end.unwrap_or(today);

    let provider = YahooProvider::new(RetryPolicy::default())?;
    let bars = provider.fetch(symbol, start, end)?;
    if bars.is_empty() {
        println!("no data for {symbol}");
        return Ok(());
    }
    let count = bars.len();
    let series = SymbolSeries::new(symbol, bars)?;
    let rows = compute_table(&series, &IndicatorConfig::default());

    println!("{symbol}: {count} bars through {}", series.last_date());
    println!(
        "{:<12} {:>10} {:>8} {:>10} {:>10} {:>10}",
        "date", "close", "rsi", "sma20", "bb_lower", "bb_upper"
    );
    for row in rows.iter().rev().take(tail).rev() {
        println!(
            "{:<12} {:>10.2} {:>8} {:>10} {:>10} {:>10}",
            row.bar.date.to_string(),
            row.bar.close,
            fmt(row.rsi),
            fmt(row.sma(20)),
            fmt(row.bb_lower),
            fmt(row.bb_upper),
        );
    }
    Ok(())
}

fn fmt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}
