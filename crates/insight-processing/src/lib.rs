//! Job market dataset processing.
//!
//! Loads the fixed-schema job table with polars, derives the salary
//! category, label-encodes every categorical field and assembles the feature
//! vectors consumed by the classifiers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use insight_processing::{DatasetConfig, EncodingLayer, Field, JobDataset, RawInputs, Target};
//!
//! let dataset = JobDataset::load(&DatasetConfig::default())?;
//! let encoder = EncodingLayer::fit(&dataset)?;
//!
//! let inputs = RawInputs::from_record(&dataset.records()[0]);
//! let vector = Target::Automation.feature_set().assemble(&encoder, &inputs)?;
//! ```
//!
//! # Modules
//!
//! - [`schema`]: column names, descriptions and the [`Field`] enum
//! - [`bucket`]: salary bucketing
//! - [`dataset`]: CSV loading and typed records
//! - [`encoding`]: per-field category mappings and the encoded table
//! - [`features`]: targets, feature sets and raw prediction inputs
//! - [`profiler`]: statistics, cleaning checks and class distributions

pub mod bucket;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod features;
pub mod profiler;
pub mod schema;
pub mod types;

pub use bucket::{SalaryBucket, bucket};
pub use config::{ConfigValidationError, DatasetConfig, DatasetConfigBuilder};
pub use dataset::{JobDataset, Record};
pub use encoding::{CategoryMapping, EncodedTable, EncodingLayer};
pub use error::{ProcessingError, Result, ResultExt};
pub use features::{Feature, FeatureSet, RawInputs, Target, TrainingMatrix, encode_for};
pub use profiler::{DatasetProfiler, class_distribution, class_samples, samples_per_class};
pub use schema::{Field, SALARY_COLUMN};
pub use types::{
    ClassCount, ClassDistribution, CleaningReport, ColumnCount, ColumnInfo, DatasetOverview,
    EncodingPair, EncodingPreview, NumericSummary, UniqueValues,
};

// Re-export polars for downstream crates that render frames.
pub use polars;

static_assertions::assert_impl_all!(JobDataset: Send, Sync);
static_assertions::assert_impl_all!(EncodingLayer: Send, Sync);

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dataset::JobDataset;
    use polars::prelude::*;

    pub(crate) fn sample_frame() -> DataFrame {
        df!(
            "Job_Title" => &["Data Scientist", "HR Manager", "Data Scientist"],
            "Industry" => &["Tech", "Finance", "Tech"],
            "Company_Size" => &["Large", "Small", "Medium"],
            "Location" => &["USA", "Berlin", "Tokyo"],
            "AI_Adoption_Level" => &["High", "Low", "Medium"],
            "Automation_Risk" => &["Low", "High", "Medium"],
            "Required_Skills" => &["Python", "Communication", "Python"],
            "Salary_USD" => &[120_000.0f64, 45_000.0, 250_000.0],
            "Remote_Friendly" => &["Yes", "No", "Yes"],
            "Job_Growth_Projection" => &["Growth", "Decline", "Stable"]
        )
        .unwrap()
    }

    pub(crate) fn sample_dataset() -> JobDataset {
        JobDataset::from_dataframe(sample_frame()).unwrap()
    }
}
