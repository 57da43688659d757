//! Error types for flowtrace.

use thiserror::Error;

/// Result type alias using `AnalyzerError`.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur around the analysis pipeline.
///
/// The pipeline itself is infallible on a valid batch; these errors surface
/// at the seams: detector configuration validation and result serialization.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    ValidationError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AnalyzerError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        AnalyzerError::ValidationError(msg.into())
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        AnalyzerError::SerializationError(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        AnalyzerError::InternalError(msg.into())
    }

    /// Returns true if this is a recoverable error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalyzerError::ValidationError(_))
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = AnalyzerError::validation("empty batch");
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Input validation failed: empty batch");

        let err = AnalyzerError::internal("state corrupted");
        assert!(!err.is_recoverable());
    }
}
