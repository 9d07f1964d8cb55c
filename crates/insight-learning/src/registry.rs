//! The set of loaded classifiers.

use crate::artifact::ModelArtifact;
use crate::error::{LearningError, Result};
use crate::forest::Classifier;
use crate::types::ModelInfo;
use insight_processing::{EncodingLayer, Target};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// One verified [`ModelArtifact`] per [`Target`].
///
/// A registry always holds all three targets; construction fails otherwise,
/// so lookups never miss.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRegistry {
    artifacts: BTreeMap<Target, ModelArtifact>,
}

impl ModelRegistry {
    /// Load and verify `RFC_Automation.json`, `RFC_GrowthPrediction.json`
    /// and `RFC_Salary.json` from `dir`.
    ///
    /// # Errors
    ///
    /// - [`LearningError::ArtifactLoad`] if a file is missing or unreadable
    /// - [`LearningError::ArtifactMismatch`] if an artifact disagrees with
    ///   the live mappings
    pub fn load_dir(dir: impl AsRef<Path>, encoder: &EncodingLayer) -> Result<Self> {
        let dir = dir.as_ref();
        let artifacts = Target::ALL
            .into_iter()
            .map(|target| ModelArtifact::load(ModelArtifact::path_in(dir, target)))
            .collect::<Result<Vec<_>>>()?;
        let registry = Self::from_artifacts(artifacts, encoder)?;
        info!("Loaded {} classifiers from {}", Target::ALL.len(), dir.display());
        Ok(registry)
    }

    /// Build a registry from freshly trained or loaded artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::ArtifactMismatch`] if an artifact does not
    /// verify, and [`LearningError::ArtifactLoad`] if a target is missing.
    pub fn from_artifacts(
        artifacts: impl IntoIterator<Item = ModelArtifact>,
        encoder: &EncodingLayer,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for artifact in artifacts {
            artifact.verify(artifact.target, encoder)?;
            map.insert(artifact.target, artifact);
        }
        if let Some(missing) = Target::ALL.into_iter().find(|t| !map.contains_key(t)) {
            return Err(LearningError::ArtifactLoad {
                path: ModelArtifact::file_name(missing),
                reason: format!("no classifier for '{missing}'"),
            });
        }
        Ok(Self { artifacts: map })
    }

    /// Write every artifact into `dir` under its canonical file name.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::Io`] or [`LearningError::Json`] on failure.
    pub fn save_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        for artifact in self.artifacts.values() {
            artifact.save(ModelArtifact::path_in(dir, artifact.target))?;
        }
        Ok(())
    }

    pub fn artifact(&self, target: Target) -> Result<&ModelArtifact> {
        self.artifacts
            .get(&target)
            .ok_or_else(|| LearningError::Inference(format!("no classifier for '{target}'")))
    }

    pub fn classifier(&self, target: Target) -> Result<&dyn Classifier> {
        Ok(&self.artifact(target)?.forest)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &ModelArtifact> {
        self.artifacts.values()
    }

    pub fn infos(&self) -> Vec<ModelInfo> {
        self.artifacts.values().map(ModelArtifact::info).collect()
    }
}

static_assertions::assert_impl_all!(ModelRegistry: Send, Sync);
