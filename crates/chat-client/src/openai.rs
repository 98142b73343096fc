use analysis_core::{AnalysisError, ChatMessage, ChatProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ChatConfig;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// OpenAI-compatible `/v1/chat/completions` client
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: reqwest::Client,
    config: ChatConfig,
}

impl OpenAiChatClient {
    pub fn new(config: ChatConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Chat HTTP client setup failed, falling back to defaults without a timeout: {}", e);
                reqwest::Client::new()
            });

        Self { client, config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ChatConfig::default())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send the conversation and return the first choice's text
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError> {
        if self.config.api_key.is_empty() {
            return Err(AnalysisError::Upstream("OPENAI_API_KEY is not set".to_string()));
        }

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AnalysisError::Upstream(format!("Chat completion failed ({}): {}", status, message)));
        }

        parse_completion(&body)
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError> {
        self.chat(messages).await
    }
}

fn parse_completion(body: &str) -> Result<String, AnalysisError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::Upstream(format!("Invalid completion payload: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| AnalysisError::Upstream("Completion returned no choices".to_string()))
}
