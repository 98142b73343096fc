pub mod alpha_vantage;
pub mod format;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use format::{format_dollars, format_large_number, format_percentage};
pub use yahoo::YahooFinanceClient;

use analysis_core::AnalysisError;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("stock-insight/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("HTTP client setup failed, falling back to defaults without a timeout: {}", e);
            reqwest::Client::new()
        })
}

fn upstream(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Upstream(e.to_string())
}
