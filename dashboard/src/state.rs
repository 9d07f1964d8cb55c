//! Application state.
//!
//! Everything the pages read is built once at startup and never mutated:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         AppContext                           │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │  config: AppConfig           │  registry: ModelRegistry      │
//! │  - data_path                 │  - RFC_Automation             │
//! │  - models_dir                │  - RFC_GrowthPrediction       │
//! │                              │  - RFC_Salary                 │
//! ├──────────────────────────────┴───────────────────────────────┤
//! │  data: DataContext                                           │
//! │  - dataset: JobDataset   (typed records + Salary_Category)   │
//! │  - encoder: EncodingLayer (one mapping per field)            │
//! │  - table: EncodedTable   (codes per row)                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `train` command only needs a [`DataContext`]; every page needs the
//! full [`AppContext`], so a missing or stale model directory fails before
//! any page is rendered.

use crate::error::Result;
use insight_learning::{ModelRegistry, Predictor};
use insight_processing::{DatasetConfig, EncodedTable, EncodingLayer, JobDataset};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable overriding the dataset path.
pub const DATA_ENV: &str = "JOB_INSIGHT_DATA";

/// Environment variable overriding the model directory.
pub const MODELS_ENV: &str = "JOB_INSIGHT_MODELS";

pub const DEFAULT_MODELS_DIR: &str = "models";

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Where the dashboard reads its inputs from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub models_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(insight_processing::config::DEFAULT_DATA_PATH),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by [`DATA_ENV`] and [`MODELS_ENV`] when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            data_path: non_empty(DATA_ENV).map_or(defaults.data_path, PathBuf::from),
            models_dir: non_empty(MODELS_ENV).map_or(defaults.models_dir, PathBuf::from),
        }
    }

    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    #[must_use]
    pub fn with_models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.models_dir = dir.into();
        self
    }
}

// ============================================================================
// DATA
// ============================================================================

/// The loaded table with its encodings.
#[derive(Debug, Clone)]
pub struct DataContext {
    pub dataset: JobDataset,
    pub encoder: EncodingLayer,
    pub table: EncodedTable,
}

impl DataContext {
    /// Load the table at `config.data_path`, fit the mappings and encode it.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let dataset_config = DatasetConfig::builder()
            .data_path(&config.data_path)
            .build()?;
        let dataset = JobDataset::load(&dataset_config)?;
        Self::from_dataset(dataset)
    }

    pub fn from_dataset(dataset: JobDataset) -> Result<Self> {
        let encoder = EncodingLayer::fit(&dataset)?;
        let table = encoder.transform(&dataset)?;
        debug!(
            "Encoded {} rows across {} mappings",
            table.len(),
            encoder.mappings().len()
        );
        Ok(Self {
            dataset,
            encoder,
            table,
        })
    }
}

// ============================================================================
// APPLICATION CONTEXT
// ============================================================================

/// Immutable state shared by every page.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: AppConfig,
    data: DataContext,
    registry: ModelRegistry,
}

impl AppContext {
    /// Load the data and the three classifiers.
    ///
    /// Fails if the table cannot be read or any artifact is missing or does
    /// not match the table's mappings.
    pub fn load(config: AppConfig) -> Result<Self> {
        let data = DataContext::load(&config)?;
        let registry = ModelRegistry::load_dir(&config.models_dir, &data.encoder)?;
        info!(
            "Dashboard ready: {} rows from {}, models from {}",
            data.dataset.len(),
            config.data_path.display(),
            config.models_dir.display()
        );
        Ok(Self::from_parts(config, data, registry))
    }

    pub fn from_parts(config: AppConfig, data: DataContext, registry: ModelRegistry) -> Self {
        Self {
            config,
            data,
            registry,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data(&self) -> &DataContext {
        &self.data
    }

    pub fn dataset(&self) -> &JobDataset {
        &self.data.dataset
    }

    pub fn encoder(&self) -> &EncodingLayer {
        &self.data.encoder
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(&self.data.encoder, &self.registry)
    }
}

static_assertions::assert_impl_all!(AppContext: Send, Sync);
