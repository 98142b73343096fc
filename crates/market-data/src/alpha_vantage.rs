use analysis_core::{AnalysisError, CompanyOverview, OverviewProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::format::{format_dollars, format_large_number, format_percentage};
use crate::{http_client, upstream};

const BASE_URL: &str = "https://www.alphavantage.co";

/// Company fundamentals from the Alpha Vantage OVERVIEW function
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url: base_url.into(),
        }
    }

    pub async fn get_overview(&self, symbol: &str) -> Result<CompanyOverview, AnalysisError> {
        let url = format!("{}/query", self.base_url);
        tracing::debug!("Fetching company overview for {}", symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(upstream)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let payload: Value = response.json().await.map_err(upstream)?;
        parse_overview(symbol, payload)
    }
}

#[async_trait]
impl OverviewProvider for AlphaVantageClient {
    async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, AnalysisError> {
        self.get_overview(symbol).await
    }
}

fn parse_overview(symbol: &str, payload: Value) -> Result<CompanyOverview, AnalysisError> {
    let data = match payload {
        Value::Object(map) => map,
        other => {
            return Err(AnalysisError::Upstream(format!(
                "Unexpected overview payload: {}",
                other
            )))
        }
    };

    // Rate limits and bad keys come back as 200 with a message instead of data
    for key in ["Note", "Information", "Error Message"] {
        if let Some(Value::String(message)) = data.get(key) {
            return Err(AnalysisError::Upstream(message.clone()));
        }
    }

    let field = |key: &str| text(&data, key);
    let reported_symbol = match data.get("Symbol") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(AnalysisError::NoData(format!("No company overview for {}", symbol))),
    };

    Ok(CompanyOverview {
        symbol: reported_symbol,
        name: field("Name"),
        sector: field("Sector"),
        industry: field("Industry"),
        country: field("Country"),
        description: field("Description"),
        market_cap: format_large_number(&field("MarketCapitalization")),
        dividend_yield: format_percentage(&field("DividendYield")),
        week52_high: format_dollars(&field("52WeekHigh")),
        week52_low: format_dollars(&field("52WeekLow")),
        currency: field("Currency"),
        exchange: field("Exchange"),
    })
}

fn text(data: &Map<String, Value>, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "N/A".to_string(),
    }
}
