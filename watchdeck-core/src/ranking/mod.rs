//! Ranking selector — reduce the universe table to a bounded watchlist.
//!
//! Latest snapshot per symbol → Buy rows (falling back to the whole snapshot
//! set when no symbol is a Buy) → sort by RSI ascending, volume descending,
//! symbol ascending → take N → attach suggested entry/exit price ranges.
//!
//! Fully deterministic: the snapshot reduction iterates symbols in sorted
//! order and every sort key chain ends in the symbol itself, so the result
//! does not depend on the order rows were accumulated in.

use crate::signals::{SignalConfig, SignalRow, TradeSignal};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Order-normalized closed interval: `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn normalized(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// One selected row plus its suggested trading ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistEntry {
    pub row: SignalRow,
    /// Suggested entry interval: lower band to the fast SMA.
    pub entry_range: Option<PriceRange>,
    /// Suggested exit interval: slow SMA (or band basis) to the upper band.
    pub exit_range: Option<PriceRange>,
}

/// RSI ascending (undefined last), volume descending, symbol ascending.
fn rank(a: &SignalRow, b: &SignalRow) -> Ordering {
    match (a.indicators.rsi, b.indicators.rsi) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.indicators.bar.volume.cmp(&a.indicators.bar.volume))
    .then_with(|| a.indicators.bar.symbol.cmp(&b.indicators.bar.symbol))
}

/// Reduce to the row with the maximum date per symbol.
fn latest_snapshot(universe: &[SignalRow]) -> Vec<&SignalRow> {
    let mut latest: BTreeMap<&str, &SignalRow> = BTreeMap::new();
    for row in universe {
        let symbol = row.indicators.bar.symbol.as_str();
        let newer = match latest.get(symbol) {
            Some(existing) => row.indicators.bar.date > existing.indicators.bar.date,
            None => true,
        };
        if newer {
            latest.insert(symbol, row);
        }
    }
    latest.into_values().collect()
}

/// Select the top `limit` candidates from the universe table.
pub fn select_watchlist(
    universe: &[SignalRow],
    limit: usize,
    config: &SignalConfig,
) -> Vec<WatchlistEntry> {
    let snapshot = latest_snapshot(universe);

    let mut candidates: Vec<&SignalRow> = snapshot
        .iter()
        .copied()
        .filter(|row| row.short_signal == TradeSignal::Buy)
        .collect();
    if candidates.is_empty() {
        // Guarantee a non-empty watchlist when the caller expects N rows.
        candidates = snapshot;
    }

    candidates.sort_by(|a, b| rank(a, b));
    candidates.truncate(limit);

    candidates
        .into_iter()
        .map(|row| {
            let ind = &row.indicators;
            let entry_range = ind
                .bb_lower
                .zip(ind.sma(config.fast_window))
                .map(|(a, b)| PriceRange::normalized(a, b));
            let exit_anchor = ind.sma(config.slow_window).or(ind.bb_basis);
            let exit_range = exit_anchor
                .zip(ind.bb_upper)
                .map(|(a, b)| PriceRange::normalized(a, b));
            WatchlistEntry {
                row: row.clone(),
                entry_range,
                exit_range,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, SymbolSeries};
    use crate::indicators::{compute_table, make_bars_for, IndicatorConfig, IndicatorRow};
    use crate::signals::classify;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn classify_series(symbol: &str, closes: &[f64]) -> Vec<SignalRow> {
        let series = SymbolSeries::new(symbol, make_bars_for(symbol, closes)).unwrap();
        compute_table(&series, &IndicatorConfig::default())
            .into_iter()
            .map(|row| classify(row, &SignalConfig::default()))
            .collect()
    }

    /// Snapshot row with explicit RSI and volume, everything else defined.
    fn snapshot_row(symbol: &str, day: u32, rsi: Option<f64>, volume: u64) -> SignalRow {
        let bar = Bar {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume,
        };
        let mut sma = BTreeMap::new();
        sma.insert(20, Some(100.0));
        sma.insert(50, Some(100.0));
        sma.insert(200, Some(100.0));
        classify(
            IndicatorRow {
                bar,
                sma,
                rsi,
                bb_basis: Some(100.0),
                bb_upper: Some(105.0),
                bb_lower: Some(95.0),
                bb_width: Some(10.0),
            },
            &SignalConfig::default(),
        )
    }

    #[test]
    fn buy_signal_takes_priority() {
        // A: flat then a hard drop below its lower band, RSI pinned at 0.
        let mut closes_a = vec![100.0; 29];
        closes_a.push(90.0);
        // B: gentle oscillation, RSI near 50, close inside the bands.
        let closes_b: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();

        let mut universe = classify_series("AAA", &closes_a);
        universe.extend(classify_series("BBB", &closes_b));

        let picked = select_watchlist(&universe, 1, &SignalConfig::default());
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].row.indicators.bar.symbol, "AAA");
        assert_eq!(picked[0].row.short_signal, TradeSignal::Buy);
        assert!(picked[0].row.entry_zone);
    }

    #[test]
    fn uses_latest_snapshot_per_symbol() {
        // Older Buy row must not leak into the snapshot once a newer Hold exists.
        let rows = vec![
            snapshot_row("AAA", 3, Some(25.0), 1_000),
            snapshot_row("AAA", 4, Some(55.0), 1_000),
            snapshot_row("BBB", 4, Some(20.0), 1_000),
        ];
        let picked = select_watchlist(&rows, 5, &SignalConfig::default());
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].row.indicators.bar.symbol, "BBB");
    }

    #[test]
    fn fallback_fills_watchlist_when_nothing_buys() {
        let rows = vec![
            snapshot_row("AAA", 3, Some(55.0), 1_000),
            snapshot_row("BBB", 3, Some(45.0), 1_000),
        ];
        let picked = select_watchlist(&rows, 5, &SignalConfig::default());
        // min(N, distinct symbols) rows, ranked by RSI ascending.
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].row.indicators.bar.symbol, "BBB");
        assert_eq!(picked[1].row.indicators.bar.symbol, "AAA");
    }

    #[test]
    fn ties_break_by_volume_then_symbol() {
        let rows = vec![
            snapshot_row("CCC", 3, Some(50.0), 500),
            snapshot_row("AAA", 3, Some(50.0), 2_000),
            snapshot_row("BBB", 3, Some(50.0), 500),
        ];
        let picked = select_watchlist(&rows, 3, &SignalConfig::default());
        let symbols: Vec<&str> = picked
            .iter()
            .map(|e| e.row.indicators.bar.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn undefined_rsi_ranks_last() {
        let rows = vec![
            snapshot_row("AAA", 3, None, 9_000),
            snapshot_row("BBB", 3, Some(60.0), 100),
        ];
        let picked = select_watchlist(&rows, 2, &SignalConfig::default());
        assert_eq!(picked[0].row.indicators.bar.symbol, "BBB");
        assert_eq!(picked[1].row.indicators.bar.symbol, "AAA");
    }

    #[test]
    fn ranges_are_order_normalized() {
        let rows = vec![snapshot_row("AAA", 3, Some(25.0), 1_000)];
        let picked = select_watchlist(&rows, 1, &SignalConfig::default());
        let entry = picked[0].entry_range.unwrap();
        let exit = picked[0].exit_range.unwrap();
        assert!(entry.low <= entry.high);
        assert!(exit.low <= exit.high);
        // bb_lower=95, sma20=100 / sma200=100, bb_upper=105.
        assert_eq!(entry, PriceRange::normalized(95.0, 100.0));
        assert_eq!(exit, PriceRange::normalized(100.0, 105.0));
    }

    #[test]
    fn selection_is_idempotent() {
        let mut closes = vec![100.0; 29];
        closes.push(90.0);
        let mut universe = classify_series("AAA", &closes);
        universe.extend(classify_series("BBB", &[100.0, 101.0, 99.0, 102.0, 98.0]));

        let first = select_watchlist(&universe, 10, &SignalConfig::default());
        let second = select_watchlist(&universe, 10, &SignalConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn order_of_accumulation_is_irrelevant() {
        let rows_forward = vec![
            snapshot_row("AAA", 3, Some(40.0), 1_000),
            snapshot_row("BBB", 3, Some(30.0), 1_000),
        ];
        let rows_reversed: Vec<SignalRow> = rows_forward.iter().rev().cloned().collect();
        assert_eq!(
            select_watchlist(&rows_forward, 5, &SignalConfig::default()),
            select_watchlist(&rows_reversed, 5, &SignalConfig::default()),
        );
    }
}
