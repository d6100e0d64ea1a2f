//! Error types for akx-core.

use thiserror::Error;

/// Result type alias using akx-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for AccuKnox operations
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },

    // TLS bootstrap errors
    #[error("TLS configuration incomplete: {0} is set but {1} is missing")]
    TlsIncomplete(&'static str, &'static str),

    // AccuKnox API errors
    #[error("API Error: {status}{}", body_suffix(.body))]
    Status { status: u16, body: String },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    // Tool argument errors
    #[error("'{value}' is not a valid {field}. Valid format: YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

impl Error {
    /// Create an error from a bad environment value
    pub fn invalid_env(var: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidEnv {
            var,
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status of a vendor error response, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        if e.is_timeout() {
            Error::Timeout(url)
        } else if e.is_decode() {
            Error::Decode(e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}
