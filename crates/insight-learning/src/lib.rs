//! insight-learning: random forest classifiers for the job market dashboard.
//!
//! This crate trains, persists and serves the three classifiers of the
//! dashboard (automation risk, job growth projection and salary category)
//! on top of the encoded table produced by `insight-processing`.
//!
//! # Features
//!
//! - **Seeded Random Forest**: CART trees on Gini impurity, bootstrap
//!   resampling, per-split feature subsampling
//! - **Training Runs**: train/test split per target, accuracy, confusion
//!   matrix and ranked feature importances
//! - **JSON Artifacts**: one file per target, carrying its own class list
//! - **Startup Verification**: artifacts are checked against the live
//!   category mappings before any prediction is served
//! - **Progress Reporting**: training progress callbacks
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use insight_learning::{ModelRegistry, Predictor, Trainer};
//! use insight_processing::{DatasetConfig, EncodingLayer, Field, JobDataset, RawInputs, Target};
//!
//! let dataset = JobDataset::load(&DatasetConfig::default())?;
//! let encoder = EncodingLayer::fit(&dataset)?;
//! let table = encoder.transform(&dataset)?;
//!
//! // Train and persist
//! let trainer = Trainer::builder()
//!     .on_progress(|u| println!("{:.0}% - {}", u.progress * 100.0, u.message))
//!     .build()?;
//! let registry = ModelRegistry::from_artifacts(trainer.train_all(&encoder, &table)?, &encoder)?;
//! registry.save_dir("models")?;
//!
//! // Later: load and predict
//! let registry = ModelRegistry::load_dir("models", &encoder)?;
//! let predictor = Predictor::new(&encoder, &registry);
//! let inputs = RawInputs::from_record(&dataset.records()[0]);
//! let prediction = predictor.predict(Target::Automation, &inputs)?;
//! println!("{} ({:.0}%)", prediction.label, prediction.confidence() * 100.0);
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LearningError>`]. Errors that
//! come from a single prediction request (unknown category, missing input,
//! bad salary) report [`LearningError::is_recoverable`] as `true`; artifact
//! errors are fatal at startup.
//!
//! # Thread Safety
//!
//! [`RandomForest`], [`ModelRegistry`] and [`Trainer`] are `Send + Sync`.
//! Training is single-threaded and fully determined by its seeds.

pub mod artifact;
pub mod config;
pub mod error;
pub mod forest;
pub mod metrics;
pub mod predict;
pub mod progress;
pub mod registry;
pub mod split;
pub mod training;
pub mod types;

pub use artifact::ModelArtifact;
pub use config::{ForestConfig, ForestConfigBuilder, MaxFeatures, TrainingConfig, TrainingConfigBuilder};
pub use error::{LearningError, Result};
pub use forest::{Classifier, DecisionTree, Node, RandomForest};
pub use metrics::{ConfusionMatrix, RankedFeature, accuracy, importance_frame, rank_importances};
pub use predict::Predictor;
pub use progress::{ProgressCallback, ProgressUpdate, TrainingStage};
pub use registry::ModelRegistry;
pub use split::{TrainTestSplit, train_test_split};
pub use training::{Trainer, TrainerBuilder};
pub use types::{ClassProbability, ModelInfo, Prediction, TrainingReport};
