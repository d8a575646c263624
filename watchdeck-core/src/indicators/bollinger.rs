//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! basis = SMA(close, length); upper/lower = basis ± mult * stddev;
//! width = upper - lower (raw, not normalized by the basis).
//! Uses population stddev (divide by N). Lookback: length - 1.

use crate::domain::Bar;

/// All four Bollinger columns for one scan, equal length to the input.
#[derive(Debug, Clone)]
pub struct BollingerColumns {
    pub basis: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

/// Windowed Bollinger scan over the close column.
pub fn bollinger(bars: &[Bar], length: usize, mult: f64) -> BollingerColumns {
    assert!(length >= 1, "Bollinger length must be >= 1");
    let n = bars.len();
    let mut columns = BollingerColumns {
        basis: vec![f64::NAN; n],
        upper: vec![f64::NAN; n],
        lower: vec![f64::NAN; n],
        width: vec![f64::NAN; n],
    };

    if n < length {
        return columns;
    }

    for i in (length - 1)..n {
        let window = &bars[(i + 1 - length)..=i];

        let mut sum = 0.0;
        let mut has_nan = false;
        for bar in window {
            if bar.close.is_nan() {
                has_nan = true;
                break;
            }
            sum += bar.close;
        }
        if has_nan {
            continue;
        }

        let mean = sum / length as f64;
        let variance: f64 = window
            .iter()
            .map(|bar| {
                let diff = bar.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / length as f64;
        let stddev = variance.sqrt();

        columns.basis[i] = mean;
        columns.upper[i] = mean + mult * stddev;
        columns.lower[i] = mean - mult * stddev;
        columns.width[i] = columns.upper[i] - columns.lower[i];
    }

    columns
}
