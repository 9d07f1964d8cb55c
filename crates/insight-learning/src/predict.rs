//! Prediction over the loaded classifiers.
//!
//! [`Predictor`] looks up each raw input in its category mapping, assembles
//! the vector in the target's feature order, runs the classifier and decodes
//! the label through the class list stored in the artifact.

use crate::error::{LearningError, Result};
use crate::forest::argmax;
use crate::registry::ModelRegistry;
use crate::types::{ClassProbability, Prediction};
use insight_processing::{EncodingLayer, RawInputs, SalaryBucket, Target, encode_for};
use tracing::debug;

/// Read-only view over the encoder and the registry.
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    encoder: &'a EncodingLayer,
    registry: &'a ModelRegistry,
}

impl<'a> Predictor<'a> {
    pub fn new(encoder: &'a EncodingLayer, registry: &'a ModelRegistry) -> Self {
        Self { encoder, registry }
    }

    /// Predict `target` from raw inputs.
    ///
    /// # Errors
    ///
    /// - `UNKNOWN_CATEGORY` if an input value was never seen in the dataset
    /// - `MISSING_INPUT` if an input the target needs was not supplied
    /// - `INVALID_SALARY` if the target needs a salary and none valid was given
    ///
    /// All three are recoverable; see [`LearningError::is_recoverable`].
    pub fn predict(&self, target: Target, inputs: &RawInputs) -> Result<Prediction> {
        let features = encode_for(target, self.encoder, inputs)?;
        let artifact = self.registry.artifact(target)?;
        let probabilities = self.registry.classifier(target)?.predict_proba(&features)?;

        let index = argmax(&probabilities);
        let label = artifact
            .class_name(index)
            .ok_or_else(|| {
                LearningError::Inference(format!("class index {index} has no name for '{target}'"))
            })?
            .to_string();
        debug!("Predicted {} = {} from {:?}", target, label, features);

        let probabilities = artifact
            .class_names
            .iter()
            .zip(probabilities)
            .map(|(label, probability)| ClassProbability {
                label: label.clone(),
                probability,
            })
            .collect();

        Ok(Prediction {
            target,
            label,
            index,
            probabilities,
            features,
        })
    }

    /// Predict every target independently; one failure does not stop the others.
    pub fn predict_all(&self, inputs: &RawInputs) -> Vec<(Target, Result<Prediction>)> {
        Target::ALL
            .into_iter()
            .map(|target| (target, self.predict(target, inputs)))
            .collect()
    }

    /// Bucket a salary, rejecting values no bucket covers.
    ///
    /// # Errors
    ///
    /// Returns `OUT_OF_RANGE_SALARY` for negative salaries or 200000 and above,
    /// `INVALID_SALARY` for non-finite input.
    pub fn bucket_salary(salary: f64) -> Result<SalaryBucket> {
        Ok(SalaryBucket::require(salary)?)
    }
}
