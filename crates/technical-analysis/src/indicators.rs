use analysis_core::{stats, Bar, IndicatorSet};
use serde::{Deserialize, Serialize};

/// Window sizes for the per-bar indicator pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            bb_period: 20,
            bb_std_dev: 2.0,
        }
    }
}

impl IndicatorConfig {
    /// Bars needed before every indicator is defined on the latest bar.
    pub fn min_bars(&self) -> usize {
        self.rsi_period.max(self.bb_period)
    }
}

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    data.windows(period).map(stats::mean).collect()
}

/// Trailing sample standard deviation (n - 1 denominator)
pub fn rolling_std(data: &[f64], period: usize) -> Vec<f64> {
    if period < 2 || data.len() < period {
        return vec![];
    }

    data.windows(period).map(stats::std_dev).collect()
}

/// RSI value from smoothed gain and loss.
///
/// A window with no losses reads 100, a flat window (no gains either) reads 50.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Relative Strength Index with simple-moving-average smoothing.
///
/// The first bar has no predecessor and contributes a zero delta, so the
/// result has `data.len() - period + 1` values, the first aligned with bar
/// `period - 1`.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut gains = Vec::with_capacity(data.len());
    let mut losses = Vec::with_capacity(data.len());
    gains.push(0.0);
    losses.push(0.0);

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    sma(&gains, period)
        .into_iter()
        .zip(sma(&losses, period))
        .map(|(avg_gain, avg_loss)| rsi_from_averages(avg_gain, avg_loss))
        .collect()
}

/// Bollinger Bands
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let middle = sma(data, period);
    let stds = rolling_std(data, period);
    if middle.is_empty() || stds.is_empty() {
        return BollingerBands { upper: vec![], middle: vec![], lower: vec![] };
    }

    let upper = middle.iter().zip(&stds).map(|(m, s)| m + std_dev * s).collect();
    let lower = middle.iter().zip(&stds).map(|(m, s)| m - std_dev * s).collect();

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Right-align a trailing-window result against `len` bars.
fn align(values: &[f64], len: usize, index: usize) -> Option<f64> {
    let offset = len - values.len();
    if index < offset {
        None
    } else {
        values.get(index - offset).copied()
    }
}

/// One IndicatorSet per bar; values stay `None` until their window is full.
pub fn indicator_sets(bars: &[Bar], config: &IndicatorConfig) -> Vec<IndicatorSet> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let rsi_values = rsi(&closes, config.rsi_period);
    let bb = bollinger_bands(&closes, config.bb_period, config.bb_std_dev);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorSet {
            date: bar.date,
            rsi: align(&rsi_values, bars.len(), i),
            sma: align(&bb.middle, bars.len(), i),
            upper_band: align(&bb.upper, bars.len(), i),
            lower_band: align(&bb.lower, bars.len(), i),
        })
        .collect()
}
