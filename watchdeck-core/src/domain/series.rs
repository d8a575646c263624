//! Validated per-symbol bar series.
//!
//! A `SymbolSeries` owns the bars for one symbol in strictly ascending date
//! order with no duplicate dates. Violations are construction errors — the
//! indicator scans assume the invariant and never re-check it.

use super::Bar;
use chrono::NaiveDate;
use thiserror::Error;

/// Precondition violations detected while building a series.
///
/// These are fatal for the affected symbol only; the caller skips the symbol
/// and continues the run.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("no bars for symbol '{symbol}'")]
    Empty { symbol: String },

    #[error("bars for '{symbol}' are not in ascending date order at position {position}")]
    OutOfOrder { symbol: String, position: usize },

    #[error("duplicate date {date} for '{symbol}'")]
    DuplicateDate { symbol: String, date: NaiveDate },
}

/// Ordered, validated bar series for one symbol.
///
/// Rebuilt from freshly fetched bars every run; nothing is persisted.
#[derive(Debug, Clone)]
pub struct SymbolSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl SymbolSeries {
    /// Build a series, validating the date-order invariant.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate {
                    symbol,
                    date: pair[1].date,
                });
            }
            if pair[1].date < pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    symbol,
                    position: i + 1,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Date of the most recent bar.
    pub fn last_date(&self) -> NaiveDate {
        // Non-empty by construction.
        self.bars[self.bars.len() - 1].date
    }
}
