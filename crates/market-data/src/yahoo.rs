use analysis_core::{AnalysisError, Bar, QuoteProvider};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::{http_client, upstream};

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily OHLCV bars from the Yahoo Finance chart endpoint
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into(),
        }
    }

    /// Get daily bars for a symbol with `from <= date < to`
    pub async fn get_daily_bars(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Bar>, AnalysisError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let period1 = from.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = to.and_time(NaiveTime::MIN).and_utc().timestamp();

        tracing::debug!("Fetching daily bars for {} ({} to {})", symbol, from, to);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(upstream)?;

        let status = response.status();
        let body = response.text().await.map_err(upstream)?;
        // Unknown symbols come back as 404 with a chart.error payload, handled below
        if !status.is_success() && status.as_u16() != 404 {
            return Err(AnalysisError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let chart: ChartResponse = serde_json::from_str(&body).map_err(upstream)?;
        let bars = parse_chart(symbol, chart)?;
        tracing::debug!("Received {} daily bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceClient {
    async fn daily_bars(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Bar>, AnalysisError> {
        self.get_daily_bars(symbol, from, to).await
    }
}

/// Turn a chart payload into chronological bars.
///
/// Rows with any missing OHLCV field are skipped; when two rows fall on the
/// same exchange-local date the later one wins.
fn parse_chart(symbol: &str, chart: ChartResponse) -> Result<Vec<Bar>, AnalysisError> {
    if let Some(error) = chart.chart.error {
        return Err(AnalysisError::NoData(format!(
            "{}: {}",
            symbol,
            error.description.unwrap_or(error.code)
        )));
    }

    let result = match chart.chart.result.and_then(|r| r.into_iter().next()) {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };
    let quote = match result.indicators.quote.into_iter().next() {
        Some(q) => q,
        None => return Ok(Vec::new()),
    };
    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);

    let mut by_date = BTreeMap::new();
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let field = |values: &[Option<f64>]| values.get(i).copied().flatten();
        let (open, high, low, close, volume) = match (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
        ) {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => continue,
        };
        let date = match DateTime::from_timestamp(ts + offset, 0) {
            Some(dt) => dt.date_naive(),
            None => continue,
        };
        by_date.insert(date, Bar { date, open, high, low, close, volume });
    }

    Ok(by_date.into_values().collect())
}

// Chart response structures
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}
