use analysis_core::{AnalysisError, IndicatorSet, PriceSeries, SignalReport};
use serde::Serialize;

use crate::indicators::*;
use crate::signals::signal_report;

/// Indicator series plus the signal read off its last bar
#[derive(Debug, Clone, Serialize)]
pub struct TechnicalReport {
    pub indicators: Vec<IndicatorSet>,
    pub signal: SignalReport,
}

pub struct TechnicalAnalysisEngine {
    config: IndicatorConfig,
}

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self::with_config(IndicatorConfig::default())
    }

    pub fn with_config(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Per-bar indicators only. Never fails; short series just stay undefined.
    pub fn indicators(&self, series: &PriceSeries) -> Vec<IndicatorSet> {
        indicator_sets(series.bars(), &self.config)
    }

    pub fn analyze(&self, series: &PriceSeries) -> Result<TechnicalReport, AnalysisError> {
        let min_bars = self.config.min_bars();
        if series.len() < min_bars {
            return Err(AnalysisError::InsufficientData(format!(
                "Need at least {} bars for technical analysis of {}, got {}",
                min_bars,
                series.symbol(),
                series.len()
            )));
        }

        let indicators = self.indicators(series);
        let (latest_bar, latest_set) = match (series.latest(), indicators.last()) {
            (Some(bar), Some(set)) => (bar, set),
            _ => {
                return Err(AnalysisError::InsufficientData(format!(
                    "No bars for {}",
                    series.symbol()
                )))
            }
        };

        let signal = signal_report(latest_bar.close, latest_set)?;
        tracing::debug!(
            symbol = series.symbol(),
            rsi = signal.rsi,
            signal = signal.label.to_label(),
            "Technical signal computed"
        );

        Ok(TechnicalReport { indicators, signal })
    }
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
