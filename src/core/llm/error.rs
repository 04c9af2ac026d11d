//! Gateway Error Types
//!
//! Errors raised while talking to a structured-extraction engine.

/// Errors that can occur during a gateway call
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl LLMError {
    /// Map a reqwest failure, keeping timeouts distinguishable from other
    /// transport errors.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LLMError::Timeout
        } else {
            LLMError::HttpError(err)
        }
    }

    /// Whether the engine answered but its output could not be used.
    ///
    /// Everything else means the engine was never reached or refused the
    /// request.
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            LLMError::InvalidResponse(_) | LLMError::SerializationError(_)
        )
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, LLMError>;
