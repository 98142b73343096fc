//! Stock API Routes
//!
//! Company fundamentals and the combined technical/forecast analysis.

use analysis_core::{AnalysisReport, CompanyOverview};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{ApiResponse, AppError, AppState};

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stocks/:symbol/overview", get(get_overview))
        .route("/api/stocks/:symbol/analysis", get(get_analysis))
}

async fn get_overview(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<CompanyOverview>>, AppError> {
    let overview = state.orchestrator.company_overview(&symbol).await?;
    Ok(Json(ApiResponse::success(overview)))
}

/// Fetches a year of daily bars and trains the forecast models, so this can take a while.
async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<AnalysisReport>>, AppError> {
    let report = state.orchestrator.analyze_symbol(&symbol).await?;
    Ok(Json(ApiResponse::success(report)))
}
