pub mod assistant;
pub mod openai;

pub use assistant::{ask, system_prompt, ChatContext, QUICK_PROMPTS};
pub use openai::OpenAiChatClient;

use std::time::Duration;

/// Configuration for the chat-completion backend
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(60),
        }
    }
}
