//! Indicator scans over a validated symbol series.
//!
//! Each indicator is an independent scan over the close column returning an
//! equal-length `Vec<f64>` with `NAN` marking positions where the window has
//! not filled yet. Undefined is a normal warmup state, never an error, and
//! never collapses to zero. `compute_table` assembles the per-bar rows,
//! surfacing undefined values as `None`.

pub mod bollinger;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, BollingerColumns};
pub use rsi::rsi;
pub use sma::sma;

use crate::domain::{Bar, SymbolSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Window configuration for one indicator pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Trailing SMA windows, one output column per entry.
    pub sma_windows: Vec<usize>,
    pub rsi_length: usize,
    pub bb_length: usize,
    pub bb_mult: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_windows: vec![20, 50, 200],
            rsi_length: 14,
            bb_length: 20,
            bb_mult: 2.0,
        }
    }
}

/// One bar plus its derived indicator columns.
///
/// `None` means the trailing window had not filled at this position.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub bar: Bar,
    pub sma: BTreeMap<usize, Option<f64>>,
    pub rsi: Option<f64>,
    pub bb_basis: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_width: Option<f64>,
}

impl IndicatorRow {
    /// SMA value for a configured window, `None` if the window is unknown or unfilled.
    pub fn sma(&self, window: usize) -> Option<f64> {
        self.sma.get(&window).copied().flatten()
    }
}

/// Map a NaN-sentinel scan value to the row representation.
fn defined(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Run every configured indicator over the series and zip the columns into rows.
///
/// The result has exactly one row per bar. Short history degrades to `None`
/// fields; it is never an error.
pub fn compute_table(series: &SymbolSeries, config: &IndicatorConfig) -> Vec<IndicatorRow> {
    let bars = series.bars();
    let n = bars.len();

    let sma_columns: Vec<(usize, Vec<f64>)> = config
        .sma_windows
        .iter()
        .map(|&window| (window, sma(bars, window)))
        .collect();
    let rsi_column = rsi(bars, config.rsi_length);
    let bands = bollinger(bars, config.bb_length, config.bb_mult);

    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let sma_values = sma_columns
            .iter()
            .map(|(window, column)| (*window, defined(column[i])))
            .collect();
        rows.push(IndicatorRow {
            bar: bars[i].clone(),
            sma: sma_values,
            rsi: defined(rsi_column[i]),
            bb_basis: defined(bands.basis[i]),
            bb_upper: defined(bands.upper[i]),
            bb_lower: defined(bands.lower[i]),
            bb_width: defined(bands.width[i]),
        });
    }
    rows
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    make_bars_for("TEST", closes)
}

#[cfg(test)]
pub fn make_bars_for(symbol: &str, closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: symbol.to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SymbolSeries;

    #[test]
    fn table_has_one_row_per_bar() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let series = SymbolSeries::new("TEST", bars).unwrap();
        let rows = compute_table(&series, &IndicatorConfig::default());
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn short_history_degrades_to_none() {
        // 10 bars against a 20-bar SMA window: every position is undefined.
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let series = SymbolSeries::new("TEST", make_bars(&closes)).unwrap();
        let rows = compute_table(&series, &IndicatorConfig::default());
        assert!(rows.iter().all(|r| r.sma(20).is_none()));
        assert!(rows.iter().all(|r| r.bb_basis.is_none()));
    }

    #[test]
    fn small_windows_fill() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = SymbolSeries::new("TEST", make_bars(&closes)).unwrap();
        let config = IndicatorConfig {
            sma_windows: vec![3],
            rsi_length: 5,
            bb_length: 4,
            bb_mult: 2.0,
        };
        let rows = compute_table(&series, &config);
        let last = rows.last().unwrap();
        assert!(last.sma(3).is_some());
        assert!(last.rsi.is_some());
        assert!(last.bb_upper.is_some());
        // A window that was never configured is undefined, not zero.
        assert!(last.sma(7).is_none());
    }
}
