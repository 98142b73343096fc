use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// One trading day of OHLCV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Chronological daily bars for a single ticker.
///
/// Dates are strictly increasing; non-trading days are simply absent.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        let symbol = symbol.into();
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalysisError::InvalidData(format!(
                "{} bars out of order or duplicated: {} followed by {}",
                symbol, pair[0].date, pair[1].date
            )));
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Per-bar indicator readings. `None` until enough history exists for the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub date: NaiveDate,
    pub rsi: Option<f64>,
    pub sma: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
}

/// Discrete trading signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalLabel {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl SignalLabel {
    /// Human-readable label for the signal
    pub fn to_label(&self) -> &'static str {
        match self {
            SignalLabel::StrongBuy => "Strong Buy",
            SignalLabel::Buy => "Buy",
            SignalLabel::Neutral => "Neutral",
            SignalLabel::Sell => "Sell",
            SignalLabel::StrongSell => "Strong Sell",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            SignalLabel::StrongBuy => "Strong technical rebound signals detected. Consider buying.",
            SignalLabel::Buy => "Buying opportunity forming. Consider entering.",
            SignalLabel::Neutral => "No clear trading signals. Maintain current position.",
            SignalLabel::Sell => "Selling signals detected. Consider partial selling.",
            SignalLabel::StrongSell => "Strong selling signals detected. Consider taking profits.",
        }
    }
}

/// Where the latest RSI sits relative to the 30/70 thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Oversold,
    Overbought,
    Neutral,
}

/// Where the latest close sits relative to the Bollinger Bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandPosition {
    BelowLower,
    AboveUpper,
    WithinBands,
}

/// Signal derived from the latest indicator readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReport {
    pub label: SignalLabel,
    pub close: f64,
    pub rsi: f64,
    pub lower_band: f64,
    pub upper_band: f64,
    pub rsi_zone: RsiZone,
    pub band_position: BandPosition,
    pub recommendation: String,
    /// RSI and band phrasing, independent of the label
    pub interpretation: Vec<String>,
}

/// Next-close estimate from one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model_name: String,
    pub predicted_price: f64,
    /// Percentage change relative to the current close
    pub delta_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outlook {
    Bullish,
    Bearish,
    Neutral,
}

impl Outlook {
    /// Bullish above +5%, bearish below -5%.
    pub fn from_delta_pct(delta_pct: f64) -> Self {
        if delta_pct > 5.0 {
            Outlook::Bullish
        } else if delta_pct < -5.0 {
            Outlook::Bearish
        } else {
            Outlook::Neutral
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Outlook::Bullish => "bullish",
            Outlook::Bearish => "bearish",
            Outlook::Neutral => "neutral",
        }
    }
}

/// Per-model forecasts plus their average
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub current_price: f64,
    pub forecasts: Vec<ForecastResult>,
    pub average_price: f64,
    pub average_delta_pct: f64,
    pub outlook: Outlook,
}

impl ForecastSummary {
    pub fn interpretation(&self) -> String {
        format!(
            "The average predicted price from the {} models is ${:.2}, representing a {:+.2}% {} compared to the current price. A {} trend is anticipated.",
            self.forecasts.len(),
            self.average_price,
            self.average_delta_pct,
            if self.average_delta_pct > 0.0 { "increase" } else { "decrease" },
            self.outlook.to_label(),
        )
    }
}

/// Latest price move and ranges for the overview cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub current_price: f64,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub volume: f64,
    pub day_low: f64,
    pub day_high: f64,
    /// Lowest low over the whole fetched series (52-week range when a year is fetched)
    pub range_low: f64,
    pub range_high: f64,
}

impl MarketSnapshot {
    /// Latest move against the previous close, plus day and series ranges.
    pub fn from_series(series: &PriceSeries) -> Result<Self, AnalysisError> {
        let bars = series.bars();
        if bars.len() < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "Need at least 2 bars for a price change, got {}",
                bars.len()
            )));
        }
        let last = &bars[bars.len() - 1];
        let previous = &bars[bars.len() - 2];
        let price_change = last.close - previous.close;

        Ok(Self {
            current_price: last.close,
            price_change,
            price_change_pct: crate::stats::pct_change(last.close, previous.close),
            volume: last.volume,
            day_low: last.low,
            day_high: last.high,
            range_low: bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
            range_high: bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Company fundamentals, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub country: String,
    pub description: String,
    pub market_cap: String,
    pub dividend_yield: String,
    pub week52_high: String,
    pub week52_low: String,
    pub currency: String,
    pub exchange: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// Input to one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub series: PriceSeries,
}

/// Everything one analysis run produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub snapshot: MarketSnapshot,
    pub indicators: Vec<IndicatorSet>,
    pub signal: SignalReport,
    pub forecast: ForecastSummary,
    pub forecast_interpretation: String,
}
