//! Error types for period construction, query resolution and transport
//!
//! Navigation itself never fails: invalid input becomes a redirect (see
//! `navigation::Destination`). The errors here are for the layers below it.
//!
//! Transport errors are classified by recoverability:
//! - Retryable: network issues, timeouts, 5xx / 429 responses
//! - NonRetryable: malformed responses, bad configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors building calendar values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Invalid date '{0}', expected yyyy-MM-dd")]
    InvalidDate(String),

    #[error("Period start {start} is after end {end}")]
    Inverted { start: String, end: String },

    #[error("Date arithmetic out of range")]
    OutOfRange,
}

/// Errors turning a navigation target into a fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("No sources selected for a filtered view")]
    MissingFilters,

    #[error("Refusing to query inverted period {start}..{end}")]
    InvertedPeriod { start: String, end: String },

    #[error("View has been closed")]
    ViewClosed,

    #[error(transparent)]
    Period(#[from] PeriodError),
}

/// Errors from the artifact API
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status}")]
    Api { status: u16, message: String },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TransportError {
    /// Returns true if trying the same request again might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            TransportError::Api { status, .. } => *status == 429 || *status >= 500,
            TransportError::Json(_) | TransportError::InvalidUrl(_) => false,
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TransportError::Http(_) => "Check that the work log API is running and try again.",
            TransportError::Api { status, .. } if *status == 429 => {
                "Wait a few minutes and try again."
            }
            TransportError::Api { .. } => "The work log API reported an error. Try again.",
            TransportError::Json(_) => "The work log API returned an unexpected response.",
            TransportError::InvalidUrl(_) => "Check apiBaseUrl in ~/.worklog/config.json",
        }
    }
}

/// Errors loading `~/.worklog/config.json`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serializable error representation for the view layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchFailure {
    pub message: String,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

impl From<&TransportError> for FetchFailure {
    fn from(err: &TransportError) -> Self {
        FetchFailure {
            message: err.to_string(),
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
