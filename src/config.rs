use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service origin; relative image paths resolve against this.
    pub base_url: String,
    /// Path of the post collection endpoint under `base_url`.
    pub posts_path: String,
    /// Delay between poll cycles.
    pub poll_interval: Duration,
    /// Per-request HTTP timeout for feed and image fetches.
    pub http_timeout: Duration,
    /// History entries logged per dashboard update.
    pub history_log_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_or_default("BASE_URL", "https://soyeonkk.pythonanywhere.com"),
            posts_path: env_or_default("POSTS_PATH", "/api_root/Post/"),
            poll_interval: Duration::from_millis(parse_env_u64("POLL_INTERVAL_MS", 3000)?),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 8)?),
            history_log_limit: parse_env_usize("HISTORY_LOG_LIMIT", 5)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "BASE_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "POLL_INTERVAL_MS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Full URL of the post collection endpoint.
    #[must_use]
    pub fn posts_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.posts_path)
    }

    /// Configuration for tests; reads no environment variables.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            base_url: "http://127.0.0.1:0".to_string(),
            posts_path: "/api_root/Post/".to_string(),
            poll_interval: Duration::from_millis(3000),
            http_timeout: Duration::from_secs(2),
            history_log_limit: 5,
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
