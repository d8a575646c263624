//! Watchdeck runner — configuration, the per-symbol pipeline loop, report
//! tables, and the output sinks.
//!
//! The core crate computes; this crate orchestrates: it loops over the symbol
//! list, tolerates per-symbol failures, assembles the universe table and its
//! watchlists, and replaces every destination table through a `TableSink`.

pub mod config;
pub mod pipeline;
pub mod report;
pub mod sink;

pub use config::{DestinationSet, Mode, RunConfig, WatchlistDest};
pub use pipeline::{run_pipeline, RunReport};
pub use sink::{CsvSink, MemorySink, SheetsSink, SinkError, TableSink};
