use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_INSTANT_ANSWER_URL: &str = "https://api.duckduckgo.com/";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub session_ttl_seconds: u64,
    pub instant_answer_url: String,
    pub instant_answer_timeout_ms: u64,
    /// Explicit history store location for hosts where the per-OS default
    /// does not apply. Assumed to be a Chromium-schema store.
    pub history_store_override: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            session_ttl_seconds: parse_u64_env("SESSION_TTL_SECONDS", 3600)?,
            instant_answer_url: env::var("INSTANT_ANSWER_URL")
                .unwrap_or_else(|_| DEFAULT_INSTANT_ANSWER_URL.to_string()),
            instant_answer_timeout_ms: parse_u64_env("INSTANT_ANSWER_TIMEOUT_MS", 5_000)?,
            history_store_override: optional_trimmed_env("HISTORY_STORE_PATH").map(PathBuf::from),
        })
    }
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::ParseInt(key.to_string())),
        Err(_) => Ok(default),
    }
}

fn optional_trimmed_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
