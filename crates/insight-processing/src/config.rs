//! Configuration for loading the job market table.
//!
//! Uses the builder pattern with validation on [`DatasetConfigBuilder::build`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/AI.csv";

/// Configuration for reading the source table.
///
/// # Example
///
/// ```rust,ignore
/// use insight_processing::DatasetConfig;
///
/// let config = DatasetConfig::builder()
///     .data_path("data/AI.csv")
///     .infer_schema_length(200)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the delimited file.
    /// Default: "data/AI.csv"
    pub data_path: PathBuf,

    /// Number of rows polars inspects to infer column types.
    /// Default: 100
    pub infer_schema_length: usize,

    /// Field separator.
    /// Default: b','
    pub separator: u8,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            infer_schema_length: 100,
            separator: b',',
        }
    }
}

impl DatasetConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DatasetConfigBuilder {
        DatasetConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.infer_schema_length == 0 {
            return Err(ConfigValidationError::InvalidSchemaLength(
                self.infer_schema_length,
            ));
        }

        if !self.separator.is_ascii() || matches!(self.separator, b'\n' | b'\r' | b'"') {
            return Err(ConfigValidationError::InvalidSeparator(
                self.separator as char,
            ));
        }

        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid schema inference length: {0} (must be at least 1)")]
    InvalidSchemaLength(usize),

    #[error("Invalid separator {0:?}")]
    InvalidSeparator(char),

    #[error("Data path must not be empty")]
    EmptyPath,
}

/// Builder for [`DatasetConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DatasetConfigBuilder {
    data_path: Option<PathBuf>,
    infer_schema_length: Option<usize>,
    separator: Option<u8>,
}

impl DatasetConfigBuilder {
    /// Set the path of the delimited file.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set how many rows are used for schema inference.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the field separator.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DatasetConfig` or an error if validation fails.
    pub fn build(self) -> Result<DatasetConfig, ConfigValidationError> {
        let defaults = DatasetConfig::default();
        let config = DatasetConfig {
            data_path: self.data_path.unwrap_or(defaults.data_path),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            separator: self.separator.unwrap_or(defaults.separator),
        };

        config.validate()?;
        Ok(config)
    }
}
