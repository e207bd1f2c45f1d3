//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `VITRINE_API_URL` - Remote API base URL (default: `https://api.vitrine.app.br`)
//! - `VITRINE_API_TIMEOUT_SECS` - Request timeout for API calls (default: 30)
//! - `VITRINE_HEALTH_TIMEOUT_SECS` - Timeout for health checks (default: 5)
//! - `VITRINE_STORAGE_PATH` - Path for the durable key-value store; unset
//!   means in-memory storage

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default remote API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.vitrine.app.br";

/// Default timeout for API calls, in seconds.
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default timeout for health checks, in seconds.
const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Vitrine client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Remote API base URL.
    pub base_url: Url,
    /// Fixed timeout applied to every API call.
    pub api_timeout: Duration,
    /// Fixed timeout applied to health checks.
    pub health_timeout: Duration,
    /// Path for the durable key-value store, if any.
    pub storage_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `VITRINE_API_URL` is not a valid URL or a
    /// timeout variable is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("VITRINE_API_URL", DEFAULT_BASE_URL)
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("VITRINE_API_URL".to_owned(), e.to_string()))?;

        let api_timeout = get_timeout_secs("VITRINE_API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?;
        let health_timeout =
            get_timeout_secs("VITRINE_HEALTH_TIMEOUT_SECS", DEFAULT_HEALTH_TIMEOUT_SECS)?;

        let storage_path = std::env::var("VITRINE_STORAGE_PATH").ok().map(PathBuf::from);

        Ok(Self {
            base_url,
            api_timeout,
            health_timeout,
            storage_path,
        })
    }

    /// Configuration pointing at an arbitrary base URL, with defaults for
    /// everything else. Used by tests and tooling.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url
                .parse::<Url>()
                .map_err(|e| ConfigError::InvalidEnvVar("base_url".to_owned(), e.to_string()))?,
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            storage_path: None,
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a seconds-valued environment variable into a `Duration`.
fn get_timeout_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url() {
        let config = ClientConfig::with_base_url("http://localhost:4000").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:4000/");
        assert_eq!(config.api_timeout, Duration::from_secs(30));
        assert_eq!(config.health_timeout, Duration::from_secs(5));
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn test_with_base_url_rejects_garbage() {
        assert!(matches!(
            ClientConfig::with_base_url("not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }
}
