//! Custom error types for dataset loading, encoding and bucketing.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! processing layer. Errors are serializable so the presentation layer can
//! forward them as `{code, message}` objects.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the processing layer.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The input table lacks one or more of the fixed header columns.
    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A cell that must hold a value is null.
    #[error("Null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },

    /// A raw categorical value has no code in the field's mapping.
    #[error("Unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    /// A salary falls outside every salary bucket.
    #[error("Salary {0} is outside every salary bucket")]
    OutOfRangeSalary(f64),

    /// A salary is missing, not a number, or negative.
    #[error("Invalid salary: {0}")]
    InvalidSalary(String),

    /// A raw input required by a feature set was not supplied.
    #[error("Missing input for field '{0}'")]
    MissingInput(String),

    /// The data table could not be read.
    #[error("Failed to load '{path}': {reason}")]
    ArtifactLoad { path: String, reason: String },

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::MissingColumns(_) => "MISSING_COLUMNS",
            Self::NullValue { .. } => "NULL_VALUE",
            Self::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            Self::OutOfRangeSalary(_) => "OUT_OF_RANGE_SALARY",
            Self::InvalidSalary(_) => "INVALID_SALARY",
            Self::MissingInput(_) => "MISSING_INPUT",
            Self::ArtifactLoad { .. } => "ARTIFACT_LOAD",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the caller can recover by supplying corrected input.
    ///
    /// Encoding and bucketing failures are local to one request; everything
    /// else happens while building the startup context and is fatal.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownCategory { .. }
            | Self::OutOfRangeSalary(_)
            | Self::InvalidSalary(_)
            | Self::MissingInput(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProcessingError::OutOfRangeSalary(250_000.0).error_code(),
            "OUT_OF_RANGE_SALARY"
        );
        assert_eq!(
            ProcessingError::UnknownCategory {
                field: "Industry".to_string(),
                value: "Mining".to_string(),
            }
            .error_code(),
            "UNKNOWN_CATEGORY"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ProcessingError::MissingInput("Location".to_string()).is_recoverable());
        assert!(ProcessingError::InvalidSalary("NaN".to_string()).is_recoverable());
        assert!(
            !ProcessingError::ArtifactLoad {
                path: "data/AI.csv".to_string(),
                reason: "not found".to_string(),
            }
            .is_recoverable()
        );
        assert!(!ProcessingError::MissingColumns(vec!["Industry".to_string()]).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = ProcessingError::UnknownCategory {
            field: "Location".to_string(),
            value: "Atlantis".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNKNOWN_CATEGORY"));
        assert!(json.contains("Atlantis"));
    }

    #[test]
    fn test_with_context() {
        let error = ProcessingError::MissingInput("Job_Title".to_string())
            .with_context("While encoding automation inputs");
        assert!(error.to_string().contains("While encoding automation inputs"));
        assert_eq!(error.error_code(), "MISSING_INPUT");
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_missing_columns_message() {
        let error = ProcessingError::MissingColumns(vec![
            "Industry".to_string(),
            "Location".to_string(),
        ]);
        assert_eq!(
            error.to_string(),
            "Dataset is missing required columns: Industry, Location"
        );
    }
}
