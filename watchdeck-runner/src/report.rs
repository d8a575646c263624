//! Report tables — headers and string rows for the sink.
//!
//! Rendering is the only place numbers become text. Undefined indicator
//! values render as empty cells, never as zero; booleans render TRUE/FALSE so
//! spreadsheet filters work on them.

use watchdeck_core::indicators::IndicatorConfig;
use watchdeck_core::ranking::WatchlistEntry;
use watchdeck_core::signals::SignalRow;
use watchdeck_core::universe::ReferenceLookup;

/// A fully rendered destination table, ready for `TableSink::replace_table`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub destination: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => String::new(),
    }
}

fn fmt_bool(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

/// Header of the full-universe table for the configured windows.
pub fn universe_header(config: &IndicatorConfig) -> Vec<String> {
    let mut header = vec![
        "Date".to_string(),
        "Symbol".to_string(),
        "Name".to_string(),
        "Category".to_string(),
        "Open".to_string(),
        "High".to_string(),
        "Low".to_string(),
        "Close".to_string(),
        "Volume".to_string(),
        format!("RSI_{}", config.rsi_length),
    ];
    for window in &config.sma_windows {
        header.push(format!("SMA_{window}"));
    }
    header.extend([
        "BB_Basis".to_string(),
        "BB_Upper".to_string(),
        "BB_Lower".to_string(),
        "BB_Width".to_string(),
        "ShortTrend".to_string(),
        "LongTrend".to_string(),
        "EntryZone".to_string(),
        "ExitZone".to_string(),
        "ShortSignal".to_string(),
        "Reason".to_string(),
    ]);
    header
}

/// Render one universe row. Column order must match `universe_header`.
pub fn universe_row(
    row: &SignalRow,
    lookup: &dyn ReferenceLookup,
    config: &IndicatorConfig,
) -> Vec<String> {
    let bar = &row.indicators.bar;
    let mut cells = vec![
        bar.date.to_string(),
        bar.symbol.clone(),
        lookup.display_name(&bar.symbol),
        lookup.category(&bar.symbol),
        fmt_value(Some(bar.open)),
        fmt_value(Some(bar.high)),
        fmt_value(Some(bar.low)),
        fmt_value(Some(bar.close)),
        bar.volume.to_string(),
        fmt_value(row.indicators.rsi),
    ];
    for window in &config.sma_windows {
        cells.push(fmt_value(row.indicators.sma(*window)));
    }
    cells.extend([
        fmt_value(row.indicators.bb_basis),
        fmt_value(row.indicators.bb_upper),
        fmt_value(row.indicators.bb_lower),
        fmt_value(row.indicators.bb_width),
        row.short_trend.as_str().to_string(),
        row.long_trend.as_str().to_string(),
        fmt_bool(row.entry_zone),
        fmt_bool(row.exit_zone),
        row.short_signal.as_str().to_string(),
        row.reason.to_string(),
    ]);
    cells
}

/// Header of a watchlist table.
pub fn watchlist_header(config: &IndicatorConfig) -> Vec<String> {
    vec![
        "Date".to_string(),
        "Symbol".to_string(),
        "Name".to_string(),
        "Close".to_string(),
        "Volume".to_string(),
        format!("RSI_{}", config.rsi_length),
        "ShortSignal".to_string(),
        "Reason".to_string(),
        "EntryLow".to_string(),
        "EntryHigh".to_string(),
        "ExitLow".to_string(),
        "ExitHigh".to_string(),
    ]
}

/// Render one watchlist row. Column order must match `watchlist_header`.
pub fn watchlist_row(entry: &WatchlistEntry, lookup: &dyn ReferenceLookup) -> Vec<String> {
    let bar = &entry.row.indicators.bar;
    vec![
        bar.date.to_string(),
        bar.symbol.clone(),
        lookup.display_name(&bar.symbol),
        fmt_value(Some(bar.close)),
        bar.volume.to_string(),
        fmt_value(entry.row.indicators.rsi),
        entry.row.short_signal.as_str().to_string(),
        entry.row.reason.to_string(),
        fmt_value(entry.entry_range.map(|r| r.low)),
        fmt_value(entry.entry_range.map(|r| r.high)),
        fmt_value(entry.exit_range.map(|r| r.low)),
        fmt_value(entry.exit_range.map(|r| r.high)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use watchdeck_core::domain::Bar;
    use watchdeck_core::indicators::IndicatorRow;
    use watchdeck_core::ranking::select_watchlist;
    use watchdeck_core::signals::{classify, SignalConfig};
    use watchdeck_core::universe::{NoReference, Universe};

    fn sample_row(rsi: Option<f64>) -> SignalRow {
        let bar = Bar {
            symbol: "2330".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume: 12_345,
        };
        let mut sma = BTreeMap::new();
        sma.insert(20, Some(100.0));
        sma.insert(50, None);
        sma.insert(200, None);
        classify(
            IndicatorRow {
                bar,
                sma,
                rsi,
                bb_basis: None,
                bb_upper: None,
                bb_lower: None,
                bb_width: None,
            },
            &SignalConfig::default(),
        )
    }

    #[test]
    fn universe_row_matches_header_width() {
        let config = IndicatorConfig::default();
        let header = universe_header(&config);
        let row = universe_row(&sample_row(Some(50.0)), &NoReference, &config);
        assert_eq!(header.len(), row.len());
    }

    #[test]
    fn undefined_renders_empty_not_zero() {
        let config = IndicatorConfig::default();
        let header = universe_header(&config);
        let row = universe_row(&sample_row(None), &NoReference, &config);

        let rsi_col = header.iter().position(|h| h == "RSI_14").unwrap();
        let sma50_col = header.iter().position(|h| h == "SMA_50").unwrap();
        assert_eq!(row[rsi_col], "");
        assert_eq!(row[sma50_col], "");
        // Defined values still render.
        let sma20_col = header.iter().position(|h| h == "SMA_20").unwrap();
        assert_eq!(row[sma20_col], "100.00");
    }

    #[test]
    fn booleans_render_spreadsheet_style() {
        let config = IndicatorConfig::default();
        let header = universe_header(&config);
        let row = universe_row(&sample_row(Some(50.0)), &NoReference, &config);
        let entry_col = header.iter().position(|h| h == "EntryZone").unwrap();
        assert_eq!(row[entry_col], "FALSE");
    }

    #[test]
    fn reference_info_fills_name_and_category() {
        let universe = Universe::from_toml(
            r#"
            symbols = ["2330"]
            [info.2330]
            name = "TSMC"
            category = "Semiconductors"
            "#,
        )
        .unwrap();
        let config = IndicatorConfig::default();
        let row = universe_row(&sample_row(Some(50.0)), &universe, &config);
        assert_eq!(row[2], "TSMC");
        assert_eq!(row[3], "Semiconductors");
    }

    #[test]
    fn watchlist_row_matches_header_width() {
        let config = IndicatorConfig::default();
        let rows = vec![sample_row(Some(25.0))];
        let entries = select_watchlist(&rows, 5, &SignalConfig::default());
        assert_eq!(entries.len(), 1);
        let header = watchlist_header(&config);
        let row = watchlist_row(&entries[0], &NoReference);
        assert_eq!(header.len(), row.len());
        // Ranges are undefined here (no bands): empty cells, not zeros.
        assert_eq!(row[8], "");
        assert_eq!(row[11], "");
    }
}
