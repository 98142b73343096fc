use analysis_core::{AnalysisError, AnalysisReport, AnalysisRequest, MarketSnapshot};
use chrono::Utc;
use forecast_engine::ForecastEngine;
use technical_analysis::TechnicalAnalysisEngine;

/// The CPU-bound half of an analysis: indicators, signal and forecast.
pub struct AnalysisPipeline {
    technical: TechnicalAnalysisEngine,
    forecast: ForecastEngine,
}

impl AnalysisPipeline {
    pub fn new(technical: TechnicalAnalysisEngine, forecast: ForecastEngine) -> Self {
        Self { technical, forecast }
    }

    pub fn technical_engine(&self) -> &TechnicalAnalysisEngine {
        &self.technical
    }

    pub fn forecast_engine(&self) -> &ForecastEngine {
        &self.forecast
    }

    /// Run every stage on an already-fetched series. No I/O.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let series = &request.series;
        let snapshot = MarketSnapshot::from_series(series)?;
        let technical = self.technical.analyze(series)?;
        let forecast = self.forecast.forecast(&series.closes())?;
        let forecast_interpretation = forecast.interpretation();

        tracing::info!(
            symbol = %request.symbol,
            bars = series.len(),
            signal = technical.signal.label.to_label(),
            outlook = forecast.outlook.to_label(),
            "Analysis complete"
        );

        Ok(AnalysisReport {
            symbol: request.symbol.clone(),
            generated_at: Utc::now(),
            snapshot,
            indicators: technical.indicators,
            signal: technical.signal,
            forecast,
            forecast_interpretation,
        })
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new(TechnicalAnalysisEngine::new(), ForecastEngine::new())
    }
}
