use analysis_core::{
    AnalysisError, AnalysisReport, AnalysisRequest, ChatMessage, ChatProvider, CompanyOverview,
    MarketSnapshot, OverviewProvider, PriceSeries, QuoteProvider,
};
use chat_client::ChatContext;
use chrono::{Duration, Utc};
use std::sync::Arc;

pub mod pipeline;
pub use pipeline::AnalysisPipeline;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Ties the data providers to the analysis pipeline and the chat assistant.
pub struct StockInsightOrchestrator {
    quotes: Arc<dyn QuoteProvider>,
    overviews: Arc<dyn OverviewProvider>,
    chat: Arc<dyn ChatProvider>,
    pipeline: Arc<AnalysisPipeline>,
    lookback_days: i64,
}

impl StockInsightOrchestrator {
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        overviews: Arc<dyn OverviewProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            quotes,
            overviews,
            chat,
            pipeline: Arc::new(AnalysisPipeline::default()),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_pipeline(mut self, pipeline: AnalysisPipeline) -> Self {
        self.pipeline = Arc::new(pipeline);
        self
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn lookback_days(&self) -> i64 {
        self.lookback_days
    }

    /// Daily bars from `lookback_days` ago up to, not including, today.
    pub async fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, AnalysisError> {
        let symbol = normalize_symbol(symbol)?;
        let to = Utc::now().date_naive();
        let from = to - Duration::days(self.lookback_days);

        let bars = self.quotes.daily_bars(&symbol, from, to).await?;
        if bars.is_empty() {
            return Err(AnalysisError::NoData(format!("No data found for {}", symbol)));
        }
        tracing::debug!("Fetched {} bars for {}", bars.len(), symbol);

        PriceSeries::new(symbol, bars)
    }

    /// Fetch a year of bars and run the full analysis off the async runtime.
    pub async fn analyze_symbol(&self, symbol: &str) -> Result<AnalysisReport, AnalysisError> {
        tracing::info!("Starting analysis for {}", symbol);
        let series = self.fetch_series(symbol).await?;
        let request = AnalysisRequest {
            symbol: series.symbol().to_string(),
            series,
        };

        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || pipeline.analyze(&request))
            .await
            .map_err(|e| AnalysisError::Model(format!("Analysis task failed: {}", e)))?
    }

    pub async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, AnalysisError> {
        let symbol = normalize_symbol(symbol)?;
        self.overviews.company_overview(&symbol).await
    }

    /// Answer a question about `symbol`, using its latest price move as context.
    pub async fn chat(
        &self,
        symbol: &str,
        history: Vec<ChatMessage>,
        question: &str,
    ) -> Result<Vec<ChatMessage>, AnalysisError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AnalysisError::InvalidData("Question must not be empty".to_string()));
        }

        let series = self.fetch_series(symbol).await?;
        let snapshot = MarketSnapshot::from_series(&series)?;
        let context = ChatContext {
            ticker: series.symbol().to_string(),
            current_price: snapshot.current_price,
            change_pct: snapshot.price_change_pct,
        };

        Ok(chat_client::ask(self.chat.as_ref(), &context, history, question).await)
    }
}

/// Trimmed, upper-cased ticker.
///
/// Only ASCII letters, digits and `.`, `-`, `^`, `=` are accepted (as in
/// `BRK.B`, `^GSPC`, `EURUSD=X`); the symbol ends up in provider URL paths.
pub fn normalize_symbol(symbol: &str) -> Result<String, AnalysisError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AnalysisError::InvalidData("Symbol must not be empty".to_string()));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(AnalysisError::InvalidData(format!("Invalid symbol: {}", symbol)));
    }
    Ok(symbol)
}
