//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{step} failed with HTTP {status}: {body}")]
    Status {
        step: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Expected token, cookie or redirect parameter is absent
    #[error("Missing {0}")]
    MissingField(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Lookup by name or primary key found nothing
    #[error("{kind} '{name}' not found, available: {available:?}")]
    NotFound {
        kind: &'static str,
        name: String,
        available: Vec<String>,
    },

    /// Weekday or date input could not be parsed
    #[error("Invalid input: {0}")]
    Parse(#[from] shared::ParseError),

    /// Stored secret is unusable
    #[error("Secret error: {0}")]
    Secret(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
