//! Watchdeck core — the time-series indicator and signal-ranking engine.
//!
//! This crate contains the pure pipeline stages plus the data boundary:
//! - Domain types: bars and validated per-symbol series
//! - Indicator scans (SMA, Wilder RSI, Bollinger Bands)
//! - Signal classifier (trend, band zones, Buy/Sell/Hold)
//! - Ranking selector (bounded, deterministic watchlists)
//! - Data providers (Yahoo Finance, static) and the shared retry policy
//! - Universe / reference lookup
//!
//! Everything between fetch and write is synchronous, in-memory computation;
//! no state survives a run.

pub mod data;
pub mod domain;
pub mod indicators;
pub mod ranking;
pub mod signals;
pub mod universe;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types that cross the runner boundary are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::SymbolSeries>();
        require_sync::<domain::SymbolSeries>();
        require_send::<indicators::IndicatorRow>();
        require_sync::<indicators::IndicatorRow>();
        require_send::<signals::SignalRow>();
        require_sync::<signals::SignalRow>();
        require_send::<ranking::WatchlistEntry>();
        require_sync::<ranking::WatchlistEntry>();
        require_send::<data::RetryPolicy>();
        require_sync::<data::RetryPolicy>();
        require_send::<universe::Universe>();
        require_sync::<universe::Universe>();
    }
}
