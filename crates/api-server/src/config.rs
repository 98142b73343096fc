use anyhow::Context;
use chat_client::ChatConfig;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Server settings, read from the environment (after `.env` is loaded)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub alpha_vantage_api_key: String,
    pub chat: ChatConfig,
    pub lookback_days: i64,
    pub forecast_parallel: bool,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let alpha_vantage_api_key = var("ALPHA_VANTAGE_API_KEY").unwrap_or_else(|| {
            tracing::warn!("ALPHA_VANTAGE_API_KEY not set, using the rate-limited demo key");
            "demo".to_string()
        });

        let api_key = var("OPENAI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY not set, chat replies will report the error");
        }
        let defaults = ChatConfig {
            api_key,
            ..ChatConfig::default()
        };
        let chat = ChatConfig {
            model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4".to_string()),
            base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com".to_string()),
            ..defaults
        };

        let lookback_days = match var("LOOKBACK_DAYS") {
            Some(v) => v.trim().parse().context("LOOKBACK_DAYS must be a whole number of days")?,
            None => 365,
        };
        if lookback_days <= 0 {
            anyhow::bail!("LOOKBACK_DAYS must be positive, got {}", lookback_days);
        }

        let forecast_parallel = match var("FORECAST_PARALLEL") {
            Some(v) => parse_bool(&v).with_context(|| format!("FORECAST_PARALLEL must be true or false, got {}", v))?,
            None => true,
        };

        Ok(Self {
            bind_addr,
            alpha_vantage_api_key,
            chat,
            lookback_days,
            forecast_parallel,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
