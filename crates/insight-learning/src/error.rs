//! Error types for the insight-learning crate.
//!
//! This module defines [`LearningError`], the main error type used throughout
//! the crate. All public API functions return `Result<T, LearningError>`.
//!
//! # Error Handling
//!
//! Errors fall into two groups:
//! - **Startup errors** ([`ArtifactLoad`](LearningError::ArtifactLoad),
//!   [`ArtifactMismatch`](LearningError::ArtifactMismatch), configuration and
//!   data errors) abort construction of the application context.
//! - **Request errors** (unknown category, missing input, invalid or
//!   out-of-range salary) affect one prediction only and are reported to the
//!   caller; see [`LearningError::is_recoverable`].

use insight_processing::ProcessingError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for insight-learning operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LearningError {
    /// Invalid configuration provided to the forest or trainer.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data provided for training or inference.
    ///
    /// Common causes:
    /// - Empty design matrix
    /// - Rows of differing width
    /// - A label index outside the declared class count
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A model artifact could not be read or parsed.
    #[error("Failed to load model artifact '{path}': {reason}")]
    ArtifactLoad {
        /// The artifact path.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// A loaded artifact disagrees with the live category mappings.
    ///
    /// Raised when the persisted feature order or class list differs from
    /// what the current dataset produces. Retrain the models to fix it.
    #[error("Model artifact for '{target}' does not match the dataset: {reason}")]
    ArtifactMismatch {
        /// The target whose artifact diverged.
        target: String,
        /// Which part diverged.
        reason: String,
    },

    /// An error occurred during inference/prediction.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Encoding, bucketing or dataset error from the processing layer.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// I/O error during artifact save/load operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LearningError {
    /// Get error code for frontend handling.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::ArtifactLoad { .. } => "ARTIFACT_LOAD",
            Self::ArtifactMismatch { .. } => "ARTIFACT_MISMATCH",
            Self::Inference(_) => "INFERENCE_ERROR",
            Self::Processing(inner) => inner.error_code(),
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Check if the error only affects the current request.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Processing(inner) => inner.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for LearningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("LearningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_errors_keep_their_code() {
        let err: LearningError = ProcessingError::UnknownCategory {
            field: "Industry".to_string(),
            value: "Mining".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "UNKNOWN_CATEGORY");
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Unknown category 'Mining' for field 'Industry'");
    }

    #[test]
    fn test_startup_errors_are_fatal() {
        let err = LearningError::ArtifactMismatch {
            target: "salary".to_string(),
            reason: "class list differs".to_string(),
        };
        assert_eq!(err.error_code(), "ARTIFACT_MISMATCH");
        assert!(!err.is_recoverable());
        assert!(!LearningError::ArtifactLoad {
            path: "models/RFC_Salary.json".to_string(),
            reason: "missing".to_string(),
        }
        .is_recoverable());
    }

    #[test]
    fn test_serialization() {
        let err = LearningError::InvalidData("empty design matrix".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVALID_DATA");
        assert_eq!(json["message"], "Invalid data: empty design matrix");
    }
}
