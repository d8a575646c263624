//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses:
//! `avg = avg_prev * (length-1)/length + current/length`.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! First defined value at index `length`. `avg_loss == 0` yields RSI = 100,
//! including the flat-series case, so downstream division never sees NaN/inf.

use crate::domain::Bar;

/// Wilder RSI over the close column.
pub fn rsi(bars: &[Bar], length: usize) -> Vec<f64> {
    assert!(length >= 1, "RSI length must be >= 1");
    let n = bars.len();
    let mut result = vec![f64::NAN; n];

    if n < length + 1 {
        return result;
    }

    // Day-over-day close deltas; changes[0] is unused.
    let mut changes = vec![f64::NAN; n];
    for i in 1..n {
        changes[i] = bars[i].close - bars[i - 1].close;
    }

    // Seed: simple mean of gains/losses over the first `length` deltas.
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for &change in &changes[1..=length] {
        if change.is_nan() {
            return result;
        }
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= length as f64;
    avg_loss /= length as f64;

    result[length] = rsi_value(avg_gain, avg_loss);

    let alpha = 1.0 / length as f64;
    for i in (length + 1)..n {
        if changes[i].is_nan() {
            // A hole in the closes breaks the recursive average for good.
            return result;
        }

        let gain = changes[i].max(0.0);
        let loss = (-changes[i]).max(0.0);

        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;

        result[i] = rsi_value(avg_gain, avg_loss);
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = rsi(&bars, 3);
        assert_approx(result[3], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = rsi(&bars, 3);
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_series_is_100() {
        // No movement at all: avg_loss == 0 → 100 by definition.
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let result = rsi(&bars, 3);
        assert_approx(result[3], 100.0, 1e-6);
        assert_approx(result[4], 100.0, 1e-6);
    }

    #[test]
    fn rsi_warmup_is_nan() {
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = rsi(&bars, 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(result[3] > 0.0 && result[3] < 100.0);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = rsi(&bars, 3);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_nan_close_truncates() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        bars[2].close = f64::NAN;
        let result = rsi(&bars, 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_too_few_bars() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let result = rsi(&bars, 14);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
