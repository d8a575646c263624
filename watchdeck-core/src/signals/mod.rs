//! Signal classification — trend, band zones, and the short-horizon signal.
//!
//! A pure function of a single indicator row. No state is carried between
//! days: yesterday's signal never influences today's.

use crate::indicators::IndicatorRow;
use serde::{Deserialize, Serialize};

/// Direction of a moving-average pair comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "Up",
            Trend::Down => "Down",
            Trend::Neutral => "Neutral",
        }
    }
}

/// Short-horizon action label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl TradeSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSignal::Buy => "Buy",
            TradeSignal::Sell => "Sell",
            TradeSignal::Hold => "Hold",
        }
    }
}

/// Classifier tuning: which SMA windows feed the trend comparisons, and the
/// tolerance band (as a fraction of the slower average) inside which a
/// comparison reads Neutral. Default 0.0 = exact compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub tolerance: f64,
    pub fast_window: usize,
    pub mid_window: usize,
    pub slow_window: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            fast_window: 20,
            mid_window: 50,
            slow_window: 200,
        }
    }
}

/// An indicator row plus its categorical labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub indicators: IndicatorRow,
    pub short_trend: Trend,
    pub long_trend: Trend,
    pub entry_zone: bool,
    pub exit_zone: bool,
    pub short_signal: TradeSignal,
    pub reason: &'static str,
}

/// Compare a fast average against a slow one. Either side undefined → Neutral.
fn trend(fast: Option<f64>, slow: Option<f64>, tolerance: f64) -> Trend {
    let (Some(fast), Some(slow)) = (fast, slow) else {
        return Trend::Neutral;
    };
    let band = slow.abs() * tolerance;
    if fast > slow + band {
        Trend::Up
    } else if fast < slow - band {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// Classify one indicator row.
///
/// Buy and Sell are checked before Hold. The only input where both the entry
/// and the exit condition hold is a zero-width band (constant closes); that
/// degenerate case reads Hold.
pub fn classify(indicators: IndicatorRow, config: &SignalConfig) -> SignalRow {
    let close = indicators.bar.close;

    let short_trend = trend(
        indicators.sma(config.fast_window),
        indicators.sma(config.mid_window),
        config.tolerance,
    );
    let long_trend = trend(
        indicators.sma(config.mid_window),
        indicators.sma(config.slow_window),
        config.tolerance,
    );

    let entry_zone = indicators.bb_lower.is_some_and(|lower| close <= lower);
    let exit_zone = indicators.bb_upper.is_some_and(|upper| close >= upper);

    let oversold = indicators.rsi.is_some_and(|rsi| rsi < 30.0);
    let overbought = indicators.rsi.is_some_and(|rsi| rsi > 70.0);

    let (short_signal, reason) = if entry_zone && exit_zone {
        (TradeSignal::Hold, "zero-width band")
    } else if oversold || entry_zone {
        (TradeSignal::Buy, "RSI<30 or touched lower band")
    } else if overbought || exit_zone {
        (TradeSignal::Sell, "RSI>70 or touched upper band")
    } else {
        (TradeSignal::Hold, "range bound")
    };

    SignalRow {
        indicators,
        short_trend,
        long_trend,
        entry_zone,
        exit_zone,
        short_signal,
        reason,
    }
}
