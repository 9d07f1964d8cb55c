//! Dashboard error type.
//!
//! Page commands return [`DashboardError`]; it wraps the library errors and
//! keeps their codes so the JSON output can be handled the same way.

use insight_learning::LearningError;
use insight_processing::{ConfigValidationError, ProcessingError};
use serde::ser::SerializeStruct;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Learning(#[from] LearningError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),

    /// A page name, filter or argument the dashboard does not know.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

impl DashboardError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Processing(inner) => inner.error_code(),
            Self::Learning(inner) => inner.error_code(),
            Self::Config(_) => "INVALID_CONFIG",
            Self::InvalidSelection(_) => "INVALID_SELECTION",
        }
    }

    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Processing(inner) => inner.is_recoverable(),
            Self::Learning(inner) => inner.is_recoverable(),
            Self::Config(_) => false,
            Self::InvalidSelection(_) => true,
        }
    }
}

impl serde::Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Error payload embedded in otherwise successful responses.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl From<&LearningError> for ErrorPayload {
    fn from(err: &LearningError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}
