use analysis_core::{ChatMessage, ChatProvider};
use serde::{Deserialize, Serialize};

/// Canned questions offered next to the chat box, as `(title, question)`.
pub const QUICK_PROMPTS: [(&str, &str); 5] = [
    (
        "Technical Analysis",
        "Can you explain the current technical analysis indicators for this stock?",
    ),
    ("Investment Risk", "What are the main investment risks for this stock?"),
    ("Market Sentiment", "What's the current market sentiment for this stock?"),
    (
        "Price Targets",
        "What are the potential price targets based on technical analysis?",
    ),
    ("Trading Strategy", "What would be a good trading strategy for this stock?"),
];

/// What the assistant is told about the ticker under discussion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub ticker: String,
    pub current_price: f64,
    pub change_pct: f64,
}

pub fn system_prompt(ticker: &str, current_price: f64, change_pct: f64) -> String {
    format!(
        "You are a helpful stock market assistant analyzing {}. \
         Current price: ${:.2} ({:+.2}%). \
         Provide clear, concise answers about this stock's performance, trends, and analysis. \
         Base your responses on general market knowledge and technical analysis principles.",
        ticker, current_price, change_pct
    )
}

/// Ask one question about the ticker and return the extended history.
///
/// Only the system preamble and the new question are sent; earlier turns stay
/// in the history for display but are not replayed to the model. A failed
/// completion becomes the reply text so the conversation can continue.
pub async fn ask(
    provider: &dyn ChatProvider,
    context: &ChatContext,
    mut history: Vec<ChatMessage>,
    question: &str,
) -> Vec<ChatMessage> {
    let messages = [
        ChatMessage::system(system_prompt(&context.ticker, context.current_price, context.change_pct)),
        ChatMessage::user(question),
    ];

    let reply = match provider.complete(&messages).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Chat completion for {} failed: {}", context.ticker, e);
            format!("Error: {}", e)
        }
    };

    history.push(ChatMessage::user(question));
    history.push(ChatMessage::assistant(reply));
    history
}
