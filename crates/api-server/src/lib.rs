use analysis_core::AnalysisError;
use analysis_orchestrator::{AnalysisPipeline, StockInsightOrchestrator};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chat_client::OpenAiChatClient;
use forecast_engine::{ForecastConfig, ForecastEngine};
use market_data::{AlphaVantageClient, YahooFinanceClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use technical_analysis::TechnicalAnalysisEngine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod chat_routes;
pub mod config;
pub mod stock_routes;

#[cfg(test)]
mod routes_tests;

pub use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<StockInsightOrchestrator>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error carrying the status it should be reported with
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: impl Into<anyhow::Error>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        let status = match &error {
            AnalysisError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::InvalidData(_) => StatusCode::BAD_REQUEST,
            AnalysisError::NoData(_) => StatusCode::NOT_FOUND,
            AnalysisError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::with_status(status, error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed ({}): {:#}", self.status, self.error);
        } else {
            tracing::debug!("Request rejected ({}): {:#}", self.status, self.error);
        }
        let body = ApiResponse::<()>::error(self.error.to_string());
        (self.status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// All routes, state attached, with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(stock_routes::stock_routes())
        .merge(chat_routes::chat_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn build_state(config: &ServerConfig) -> AppState {
    let forecast = ForecastEngine::with_config(ForecastConfig {
        parallel: config.forecast_parallel,
        ..ForecastConfig::default()
    });
    let pipeline = AnalysisPipeline::new(TechnicalAnalysisEngine::new(), forecast);

    let orchestrator = StockInsightOrchestrator::new(
        Arc::new(YahooFinanceClient::new()),
        Arc::new(AlphaVantageClient::new(config.alpha_vantage_api_key.clone())),
        Arc::new(OpenAiChatClient::new(config.chat.clone())),
    )
    .with_pipeline(pipeline)
    .with_lookback_days(config.lookback_days);

    AppState {
        orchestrator: Arc::new(orchestrator),
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api_server=info,analysis_orchestrator=info,forecast_engine=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        "Lookback {} days, chat model {}, parallel forecasts {}",
        config.lookback_days,
        config.chat.model,
        config.forecast_parallel
    );

    let router = app(build_state(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("API server listening on {}", config.bind_addr);
    axum::serve(listener, router).await?;

    Ok(())
}
