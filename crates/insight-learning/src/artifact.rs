//! Persisted classifiers.
//!
//! A [`ModelArtifact`] bundles a fitted [`RandomForest`] with the feature
//! order it was trained on and the class list used to decode its output.
//! Artifacts are stored as JSON, one file per target
//! (`RFC_Automation.json`, `RFC_GrowthPrediction.json`, `RFC_Salary.json`).

use crate::error::{LearningError, Result};
use crate::forest::{Classifier, RandomForest};
use crate::types::{ModelInfo, TrainingReport};
use chrono::{DateTime, Utc};
use insight_processing::{EncodingLayer, Target};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extension of persisted artifacts.
pub const ARTIFACT_EXTENSION: &str = "json";

/// A trained classifier with everything needed to use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub target: Target,
    /// Feature names in the order the forest expects them.
    pub feature_names: Vec<String>,
    /// Class names in label-index order.
    pub class_names: Vec<String>,
    pub forest: RandomForest,
    pub report: TrainingReport,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    /// File name of the artifact for `target`, e.g. `RFC_Salary.json`.
    #[must_use]
    pub fn file_name(target: Target) -> String {
        format!("{}.{}", target.artifact_stem(), ARTIFACT_EXTENSION)
    }

    /// Path of the artifact for `target` inside `dir`.
    #[must_use]
    pub fn path_in(dir: impl AsRef<Path>, target: Target) -> PathBuf {
        dir.as_ref().join(Self::file_name(target))
    }

    /// Loads an artifact from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::ArtifactLoad`] if the file does not exist,
    /// cannot be read, or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| LearningError::ArtifactLoad {
            path: path.display().to_string(),
            reason,
        };

        if !path.exists() {
            return Err(load_error("file does not exist".to_string()));
        }

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let artifact: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| load_error(e.to_string()))?;
        debug!(
            "Loaded {} artifact ({} trees) from {}",
            artifact.target,
            artifact.forest.trees().len(),
            path.display()
        );
        Ok(artifact)
    }

    /// Saves the artifact as JSON, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::Io`] or [`LearningError::Json`] on failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        info!("Saved {} artifact to {}", self.target, path.display());
        Ok(())
    }

    /// Check that the artifact agrees with the live category mappings.
    ///
    /// The feature order must equal the target's feature set, the class list
    /// must equal the label field's mapping, the forest's shape must match
    /// both, and every tree must be well formed.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::ArtifactMismatch`] describing the first
    /// divergence found.
    pub fn verify(&self, expected: Target, encoder: &EncodingLayer) -> Result<()> {
        let mismatch = |reason: String| LearningError::ArtifactMismatch {
            target: expected.to_string(),
            reason,
        };

        if self.target != expected {
            return Err(mismatch(format!(
                "artifact was trained for '{}'",
                self.target
            )));
        }

        let features = expected.feature_set().names();
        if self.feature_names != features {
            return Err(mismatch(format!(
                "feature order {:?} differs from {:?}",
                self.feature_names, features
            )));
        }

        let classes = encoder.mapping(expected.label_field()).classes();
        if self.class_names != classes {
            return Err(mismatch(format!(
                "class list {:?} differs from {:?}",
                self.class_names, classes
            )));
        }

        if self.forest.n_features() != features.len() || self.forest.n_classes() != classes.len()
        {
            return Err(mismatch(format!(
                "forest expects {} features and {} classes",
                self.forest.n_features(),
                self.forest.n_classes()
            )));
        }

        self.forest
            .validate()
            .map_err(|err| mismatch(format!("malformed forest: {err}")))?;

        Ok(())
    }

    /// Decode a label index through the persisted class list.
    #[must_use]
    pub fn class_name(&self, index: usize) -> Option<&str> {
        self.class_names.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            target: self.target,
            artifact: Self::file_name(self.target),
            feature_names: self.feature_names.clone(),
            class_names: self.class_names.clone(),
            n_trees: self.forest.trees().len(),
            test_accuracy: self.report.test_accuracy,
            trained_at: self.trained_at.to_rfc3339(),
        }
    }
}
