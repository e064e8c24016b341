use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if the model credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub huggingface_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Unset means the HTTP client's default (no timeout).
    pub model_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let model_timeout = match std::env::var("MODEL_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .context("MODEL_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            Err(_) => None,
        };

        Ok(Config {
            huggingface_api_key: require_env("HUGGINGFACE_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_timeout,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}
