use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{AnalysisError, Bar, ChatMessage, CompanyOverview};

/// Source of daily OHLCV bars
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Daily bars for `symbol` with `from <= date < to`, chronological.
    async fn daily_bars(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Bar>, AnalysisError>;
}

/// Source of company fundamentals
#[async_trait]
pub trait OverviewProvider: Send + Sync {
    async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, AnalysisError>;
}

/// Chat-completion backend
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete the conversation and return the assistant's text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError>;
}
