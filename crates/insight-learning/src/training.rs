//! Per-target training runs.
//!
//! The [`Trainer`] turns the encoded table into one [`ModelArtifact`] per
//! [`Target`]:
//!
//! 1. **Splitting** - Select complete rows and hold out a seeded test set
//! 2. **Training** - Fit a [`RandomForest`] on the training rows
//! 3. **Evaluation** - Score both partitions and rank feature importances
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_learning::{Trainer, TrainingConfig};
//!
//! let trainer = Trainer::builder()
//!     .config(TrainingConfig::default())
//!     .on_progress(|update| println!("{:.0}% - {}", update.progress * 100.0, update.message))
//!     .build()?;
//!
//! let artifacts = trainer.train_all(&encoder, &table)?;
//! ```

use crate::artifact::ModelArtifact;
use crate::config::TrainingConfig;
use crate::error::Result;
use crate::forest::{Classifier, RandomForest};
use crate::metrics::{ConfusionMatrix, accuracy, rank_importances};
use crate::progress::{ProgressCallback, ProgressUpdate, TrainingStage};
use crate::split::train_test_split;
use crate::types::TrainingReport;
use chrono::Utc;
use insight_processing::{EncodedTable, EncodingLayer, Target};
use std::sync::Arc;
use tracing::{info, warn};

/// Trains the classifiers of the dashboard.
///
/// Use [`Trainer::builder()`] to construct one.
#[derive(Clone)]
pub struct Trainer {
    config: TrainingConfig,
    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for Trainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trainer")
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

/// Position of one target inside a run, used to scale progress.
#[derive(Debug, Clone, Copy)]
struct RunSlot {
    index: u32,
    total: u32,
}

impl RunSlot {
    const SINGLE: RunSlot = RunSlot { index: 0, total: 1 };

    /// Overall progress for `fraction` of this slot's work.
    fn progress(self, fraction: f64) -> f64 {
        (f64::from(self.index) + fraction) / f64::from(self.total)
    }
}

impl Trainer {
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::default()
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train the classifier for one target.
    ///
    /// Rows whose label has no code (unclassified salaries) are skipped and
    /// counted in [`TrainingReport::skipped_rows`].
    ///
    /// # Errors
    ///
    /// - [`LearningError::InvalidData`](crate::LearningError::InvalidData) if too few rows remain to split
    /// - [`LearningError::InvalidConfig`](crate::LearningError::InvalidConfig) if the configuration is invalid
    pub fn train(
        &self,
        target: Target,
        encoder: &EncodingLayer,
        table: &EncodedTable,
    ) -> Result<ModelArtifact> {
        self.train_slot(target, encoder, table, RunSlot::SINGLE)
    }

    /// Train all three targets in [`Target::ALL`] order.
    ///
    /// # Errors
    ///
    /// Stops at the first target that fails; see [`train()`](Self::train).
    pub fn train_all(
        &self,
        encoder: &EncodingLayer,
        table: &EncodedTable,
    ) -> Result<Vec<ModelArtifact>> {
        let total = Target::ALL.len() as u32;
        let mut artifacts = Vec::with_capacity(Target::ALL.len());
        for (index, target) in Target::ALL.into_iter().enumerate() {
            let slot = RunSlot {
                index: index as u32,
                total,
            };
            artifacts.push(self.train_slot(target, encoder, table, slot)?);
        }
        self.emit(ProgressUpdate {
            stage: TrainingStage::Complete,
            progress: 1.0,
            message: format!("Trained {total} classifiers"),
            current_target: None,
            targets_completed: Some((total, total)),
        });
        Ok(artifacts)
    }

    fn train_slot(
        &self,
        target: Target,
        encoder: &EncodingLayer,
        table: &EncodedTable,
        slot: RunSlot,
    ) -> Result<ModelArtifact> {
        let result = self.run(target, encoder, table, slot);
        if let Err(e) = &result {
            warn!("Training {} failed: {}", target, e);
            self.emit(ProgressUpdate {
                stage: TrainingStage::Failed,
                progress: slot.progress(0.0),
                message: e.to_string(),
                current_target: Some(target.to_string()),
                targets_completed: Some((slot.index, slot.total)),
            });
        }
        result
    }

    fn run(
        &self,
        target: Target,
        encoder: &EncodingLayer,
        table: &EncodedTable,
        slot: RunSlot,
    ) -> Result<ModelArtifact> {
        let report_stage = |stage: TrainingStage, fraction: f64, message: String| {
            self.emit(ProgressUpdate {
                stage,
                progress: slot.progress(fraction),
                message,
                current_target: Some(target.to_string()),
                targets_completed: Some((slot.index, slot.total)),
            });
        };

        report_stage(
            TrainingStage::Initializing,
            0.0,
            format!("Preparing {} classifier", target.title()),
        );
        self.config.validate()?;

        let feature_set = target.feature_set();
        let label_field = target.label_field();
        let class_names = encoder.mapping(label_field).classes().to_vec();
        let feature_names: Vec<String> =
            feature_set.names().into_iter().map(String::from).collect();

        let matrix = feature_set.training_matrix(table, label_field);
        let skipped_rows = table.len() - matrix.len();
        if skipped_rows > 0 {
            info!(
                "Skipping {} rows without a {} label",
                skipped_rows,
                label_field.column_name()
            );
        }

        let test_size = self.config.test_size(target);
        report_stage(
            TrainingStage::Splitting,
            0.1,
            format!(
                "Splitting {} rows ({:.0}% held out)",
                matrix.len(),
                test_size * 100.0
            ),
        );
        let split = train_test_split(matrix.len(), test_size, self.config.split_seed)?;
        let (x_train, x_test) = split.apply(&matrix.x);
        let (y_train, y_test) = split.apply(&matrix.y);

        report_stage(
            TrainingStage::Training,
            0.2,
            format!(
                "Growing {} trees on {} rows",
                self.config.forest.n_trees,
                x_train.len()
            ),
        );
        let forest = RandomForest::fit(&x_train, &y_train, class_names.len(), &self.config.forest)?;

        report_stage(
            TrainingStage::Evaluation,
            0.8,
            "Scoring held-out rows".to_string(),
        );
        let train_predictions = predict_rows(&forest, &x_train)?;
        let test_predictions = predict_rows(&forest, &x_test)?;
        let report = TrainingReport {
            target,
            train_accuracy: accuracy(&train_predictions, &y_train),
            test_accuracy: accuracy(&test_predictions, &y_test),
            train_rows: x_train.len(),
            test_rows: x_test.len(),
            skipped_rows,
            class_names: class_names.clone(),
            feature_importance: rank_importances(&feature_names, &forest.feature_importances()),
            confusion: ConfusionMatrix::new(&test_predictions, &y_test, class_names.len()),
        };

        info!(
            "Trained {} classifier: train accuracy {:.3}, test accuracy {:.3} ({} overfitting risk)",
            target,
            report.train_accuracy,
            report.test_accuracy,
            report.overfitting_risk()
        );
        report_stage(
            TrainingStage::Complete,
            1.0,
            format!(
                "{} classifier ready (test accuracy {:.1}%)",
                target.title(),
                report.test_accuracy * 100.0
            ),
        );

        Ok(ModelArtifact {
            target,
            feature_names,
            class_names,
            forest,
            report,
            trained_at: Utc::now(),
        })
    }

    fn emit(&self, update: ProgressUpdate) {
        if let Some(callback) = &self.progress_callback {
            callback(update);
        }
    }
}

fn predict_rows(forest: &RandomForest, x: &[Vec<f64>]) -> Result<Vec<usize>> {
    x.iter().map(|row| forest.predict(row)).collect()
}

/// Builder for [`Trainer`].
///
/// The configuration defaults to [`TrainingConfig::default()`].
#[derive(Default)]
pub struct TrainerBuilder {
    config: Option<TrainingConfig>,
    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for TrainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainerBuilder")
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl TrainerBuilder {
    #[must_use]
    pub fn config(mut self, config: TrainingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the progress callback (optional).
    ///
    /// The callback runs on the training thread and should return quickly.
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Build the trainer.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`](crate::LearningError::InvalidConfig) if the configuration does
    /// not validate.
    pub fn build(self) -> Result<Trainer> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(Trainer {
            config,
            progress_callback: self.progress_callback,
        })
    }
}

static_assertions::assert_impl_all!(Trainer: Send, Sync);
