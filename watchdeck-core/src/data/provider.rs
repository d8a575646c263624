//! Market-data provider contract and structured error types.
//!
//! The `BarProvider` trait abstracts over bar sources so implementations can
//! be swapped and mocked for tests. An unlisted or delisted symbol is an
//! explicit empty result, not an error; errors describe transport and format
//! failures.

use crate::domain::Bar;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured errors for bar fetches.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("upstream HTTP {status} for '{symbol}'")]
    Upstream { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("access denied by provider: {0}")]
    AccessDenied(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            DataError::NetworkUnreachable(_) | DataError::RateLimited { .. } => true,
            DataError::Upstream { status, .. } => *status >= 500,
            DataError::ResponseFormatChanged(_)
            | DataError::AccessDenied(_)
            | DataError::SymbolNotFound { .. }
            | DataError::Other(_) => false,
        }
    }
}

/// Trait for daily-bar sources.
///
/// Returned bars carry the symbol exactly as passed in; callers own any
/// suffix normalization. Bars must be in ascending date order.
pub trait BarProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over an inclusive date range.
    /// An empty vec is the explicit "no data" signal.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Bar>, DataError>;
}

/// Fixed in-memory provider for tests and offline runs.
#[derive(Debug, Default)]
pub struct StaticProvider {
    bars: BTreeMap<String, Vec<Bar>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prepared bar series for a symbol.
    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<Bar>) {
        self.bars.insert(symbol.into(), bars);
    }
}

impl BarProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let bars = match self.bars.get(symbol) {
            Some(bars) => bars
                .iter()
                .filter(|bar| bar.date >= start && bar.date <= end)
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars_for;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn static_provider_filters_by_range() {
        let mut provider = StaticProvider::new();
        provider.insert("2330", make_bars_for("2330", &[100.0, 101.0, 102.0, 103.0]));

        // make_bars_for dates start at 2025-01-02.
        let bars = provider.fetch("2330", day(3), day(4)).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, day(3));
    }

    #[test]
    fn unknown_symbol_is_empty_not_error() {
        let provider = StaticProvider::new();
        let bars = provider.fetch("0000", day(1), day(31)).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn transient_classification() {
        assert!(DataError::NetworkUnreachable("timeout".into()).is_transient());
        assert!(DataError::RateLimited {
            retry_after_secs: 60
        }
        .is_transient());
        assert!(DataError::Upstream {
            status: 503,
            symbol: "2330".into()
        }
        .is_transient());
        assert!(!DataError::Upstream {
            status: 404,
            symbol: "2330".into()
        }
        .is_transient());
        assert!(!DataError::SymbolNotFound {
            symbol: "2330".into()
        }
        .is_transient());
        assert!(!DataError::AccessDenied("403".into()).is_transient());
    }
}
