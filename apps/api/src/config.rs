use anyhow::{Context, Result};

use crate::analysis::scores::ScoreFallback;

const DEFAULT_MAX_INPUT_CHARS: usize = 50_000;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// How missing scores are filled in (`SCORE_FALLBACK=random|midpoint`).
    pub score_fallback: ScoreFallback,
    /// Upper bound on resume / job description / AI response length, in characters.
    pub max_input_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            score_fallback: match std::env::var("SCORE_FALLBACK") {
                Ok(value) => value.parse().map_err(anyhow::Error::msg)?,
                Err(_) => ScoreFallback::default(),
            },
            max_input_chars: match std::env::var("MAX_INPUT_CHARS") {
                Ok(value) => value
                    .parse::<usize>()
                    .context("MAX_INPUT_CHARS must be a positive integer")?,
                Err(_) => DEFAULT_MAX_INPUT_CHARS,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
