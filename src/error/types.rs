//! Core error type

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors surfaced by the client and its streams.
///
/// Only terminal failures are represented here. Malformed stream records are
/// recovered locally by the decoder and never become an `LlmError`.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Transport failure while sending the request or reading the body
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success status returned by the provider
    #[error("{message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The response body failed while it was being streamed
    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// No credential was supplied and none could be found in the environment
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Request timed out: {0}")]
    TimeoutError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl LlmError {
    /// Create an API error without details
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an API error carrying the provider payload
    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// HTTP status code, when the error came from a provider response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether issuing the same request again could plausibly succeed.
    ///
    /// Informational only: the client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { code, .. } => *code == 408 || *code == 429 || *code >= 500,
            Self::TimeoutError(_) | Self::ConnectionError(_) => true,
            _ => false,
        }
    }
}
