//! Detection Error Types

use crate::core::llm::LLMError;

/// Why a detection request failed.
///
/// Every failure surfaces immediately; nothing here is retried and no
/// partial result accompanies an error.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// The gateway could not be reached, timed out, or refused the request
    #[error("Transport failure: {0}")]
    Transport(#[source] LLMError),

    /// The engine's output does not fit the declared result shape
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// The page image payload is empty
    #[error("Page image is empty")]
    EmptyInput,
}

impl From<LLMError> for DetectionError {
    fn from(err: LLMError) -> Self {
        if err.is_malformed_output() {
            DetectionError::SchemaViolation(err.to_string())
        } else {
            DetectionError::Transport(err)
        }
    }
}

pub type DetectionResult<T> = std::result::Result<T, DetectionError>;
