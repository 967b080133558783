//! Error types for the AirSafe client.

use std::time::Duration;

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl Error {
    /// True when the user closed the input stream mid-wizard.
    pub fn is_input_closed(&self) -> bool {
        matches!(self, Self::Terminal(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures talking to the remote recommendation service.
///
/// Every variant is recoverable: callers in `api::client` and
/// `api::reference` substitute a fallback instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Request to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    #[error("Invalid response body from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl ApiError {
    /// Map a reqwest error onto the taxonomy, keeping the endpoint for logs.
    pub fn from_reqwest(endpoint: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
                timeout,
            }
        } else if err.is_decode() {
            Self::Decode {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Transport {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// Endpoint path the failed call targeted.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Decode { endpoint, .. } => endpoint,
        }
    }
}

/// Result store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to serialize result bundle: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wizard navigation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} is incomplete: {reason}")]
    Incomplete { step: String, reason: String },

    #[error("Already at the last step ({step})")]
    AtLastStep { step: String },

    #[error("Already at the first step ({step})")]
    AtFirstStep { step: String },
}

/// Failures of the submission orchestration itself (not of the remote calls,
/// which always resolve through fallback).
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("A submission is already in progress")]
    AlreadyInProgress,

    #[error("Form is not ready to submit: {0}")]
    Incomplete(#[from] WizardError),

    #[error("Failed to hand off results: {0}")]
    Handoff(#[from] StoreError),
}

impl SubmissionError {
    /// Whether the front-end should offer the user a retry.
    ///
    /// Handoff failures leave the form intact, so resubmitting is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Handoff(_))
    }
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
