use analysis_core::ChatMessage;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chat_client::QUICK_PROMPTS;
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct QuickPrompt {
    pub title: String,
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, as returned by the previous call
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub history: Vec<ChatMessage>,
}

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat/prompts", get(get_quick_prompts))
        .route("/api/chat/:symbol", post(post_chat))
}

async fn get_quick_prompts() -> Json<ApiResponse<Vec<QuickPrompt>>> {
    let prompts = QUICK_PROMPTS
        .iter()
        .map(|(title, question)| QuickPrompt {
            title: title.to_string(),
            question: question.to_string(),
        })
        .collect();
    Json(ApiResponse::success(prompts))
}

async fn post_chat(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, AppError> {
    let history = state
        .orchestrator
        .chat(&symbol, request.history, &request.message)
        .await?;
    Ok(Json(ApiResponse::success(ChatResponse { history })))
}
