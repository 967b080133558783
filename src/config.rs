//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default base URL of the recommendation service (local development).
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default per-request timeout for remote calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default location of the file-backed result slot.
pub const DEFAULT_RESULTS_PATH: &str = "./data/airsafe_results.json";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote service, without a trailing slash.
    pub api_url: String,
    /// Upper bound on each remote call; exceeding it triggers fallback.
    pub request_timeout: Duration,
    /// Where the terminal front-end keeps the last result bundle.
    pub results_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }
}

impl ClientConfig {
    /// Build the configuration from `AIRSAFE_*` environment variables.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let api_url = std::env::var("AIRSAFE_API_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = std::env::var("AIRSAFE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let results_path = std::env::var("AIRSAFE_RESULTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_RESULTS_PATH));

        Self {
            api_url,
            request_timeout,
            results_path,
        }
    }

    /// Point the client at a different service (tests, staging).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reject settings the HTTP client cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "AIRSAFE_API_URL".into(),
                message: "must not be empty".into(),
            });
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "AIRSAFE_API_URL".into(),
                message: format!("expected an http(s) URL, got {}", self.api_url),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "AIRSAFE_REQUEST_TIMEOUT_SECS".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
