//! The pipeline loop: fetch → indicators → signals → rank → replace tables.
//!
//! Symbols are processed sequentially; a failing symbol is logged and
//! skipped, and the run continues with whatever succeeded. A run that
//! produces zero usable symbols aborts before any write. The write stage
//! replaces every destination in order, retrying transient sink failures;
//! the first exhausted retry aborts the run, leaving later destinations
//! untouched and never leaving one half-written.

use crate::config::RunConfig;
use crate::report::{self, Table};
use crate::sink::{SinkError, TableSink};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};
use watchdeck_core::data::BarProvider;
use watchdeck_core::domain::SymbolSeries;
use watchdeck_core::indicators::compute_table;
use watchdeck_core::ranking::select_watchlist;
use watchdeck_core::signals::{classify, SignalRow};
use watchdeck_core::universe::ReferenceLookup;

/// What a completed run did.
#[derive(Debug)]
pub struct RunReport {
    pub symbols_processed: usize,
    /// Skipped symbols with their reasons.
    pub symbols_skipped: Vec<(String, String)>,
    pub universe_rows: usize,
    pub tables_written: Vec<String>,
    pub freshness_marker: String,
    pub fingerprint: String,
}

/// Run the whole pipeline against the given collaborators.
///
/// `now` is passed in rather than read from the clock so tests and reruns
/// are reproducible; only the freshness marker depends on it.
pub fn run_pipeline(
    config: &RunConfig,
    provider: &dyn BarProvider,
    lookup: &dyn ReferenceLookup,
    sink: &dyn TableSink,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    if config.symbols.is_empty() {
        bail!("configuration error: symbol list is empty");
    }
    let end_date = config
        .end_date
        .unwrap_or_else(|| now.with_timezone(&config.timezone()).date_naive());

    let fingerprint = config.fingerprint();
    info!(
        provider = provider.name(),
        sink = sink.name(),
        symbols = config.symbols.len(),
        fingerprint = %fingerprint,
        "starting run"
    );

    let mut universe: Vec<SignalRow> = Vec::new();
    let mut skipped: Vec<(String, String)> = Vec::new();
    let mut processed = 0usize;

    for (i, symbol) in config.symbols.iter().enumerate() {
        if i > 0 && config.politeness_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(config.politeness_delay_ms));
        }
        match process_symbol(config, provider, symbol, end_date) {
            Ok(rows) => {
                info!(symbol = %symbol, rows = rows.len(), "symbol processed");
                universe.extend(rows);
                processed += 1;
            }
            Err(reason) => {
                warn!(symbol = %symbol, reason = %reason, "symbol skipped");
                skipped.push((symbol.clone(), reason));
            }
        }
    }

    if processed == 0 {
        bail!("no symbol produced usable data; aborting before write");
    }

    let freshness_marker = freshness_marker(config, now);
    let tables = build_tables(config, &universe, lookup);

    let mut tables_written = Vec::with_capacity(tables.len());
    for table in &tables {
        config
            .retry
            .run(SinkError::is_transient, || {
                sink.replace_table(
                    &table.destination,
                    &table.header,
                    &table.rows,
                    &freshness_marker,
                )
            })
            .with_context(|| format!("replacing destination table '{}'", table.destination))?;
        info!(
            destination = %table.destination,
            rows = table.rows.len(),
            "table replaced"
        );
        tables_written.push(table.destination.clone());
    }

    Ok(RunReport {
        symbols_processed: processed,
        symbols_skipped: skipped,
        universe_rows: universe.len(),
        tables_written,
        freshness_marker,
        fingerprint,
    })
}

/// Fetch and classify one symbol. Any error is a skip reason, not a run
/// failure — fetch errors (including exhausted retries inside the provider)
/// and series precondition violations are fatal for this symbol only.
fn process_symbol(
    config: &RunConfig,
    provider: &dyn BarProvider,
    symbol: &str,
    end_date: chrono::NaiveDate,
) -> std::result::Result<Vec<SignalRow>, String> {
    let fetch_symbol = format!("{symbol}{}", config.symbol_suffix);
    let bars = provider
        .fetch(&fetch_symbol, config.start_date, end_date)
        .map_err(|e| e.to_string())?;
    if bars.is_empty() {
        return Err("no bars returned".to_string());
    }

    // Carry the display symbol through the tables, not the fetch form.
    let bars = bars
        .into_iter()
        .map(|mut bar| {
            bar.symbol = symbol.to_string();
            bar
        })
        .collect();
    let series = SymbolSeries::new(symbol, bars).map_err(|e| e.to_string())?;

    let rows = compute_table(&series, &config.indicators)
        .into_iter()
        .map(|row| classify(row, &config.signals))
        .collect();
    Ok(rows)
}

/// Human-readable timestamp recorded at A1 of every destination.
fn freshness_marker(config: &RunConfig, now: DateTime<Utc>) -> String {
    let tz = config.timezone();
    let local = now.with_timezone(&tz);
    format!("Last update (UTC{tz}): {}", local.format("%Y-%m-%d %H:%M:%S"))
}

/// Render every destination table up front, before the first write, so a
/// failure can never leave some destinations on the new data and others on
/// the old for want of a render.
fn build_tables(config: &RunConfig, universe: &[SignalRow], lookup: &dyn ReferenceLookup) -> Vec<Table> {
    let destinations = config.destinations();

    let mut tables = vec![Table {
        destination: destinations.universe_table.clone(),
        header: report::universe_header(&config.indicators),
        rows: universe
            .iter()
            .map(|row| report::universe_row(row, lookup, &config.indicators))
            .collect(),
    }];

    for watchlist in &destinations.watchlists {
        let entries = select_watchlist(universe, watchlist.size, &config.signals);
        tables.push(Table {
            destination: watchlist.table.clone(),
            header: report::watchlist_header(&config.indicators),
            rows: entries
                .iter()
                .map(|entry| report::watchlist_row(entry, lookup))
                .collect(),
        });
    }

    tables
}
