//! Configuration types for the random forest and the training pipeline.
//!
//! This module provides [`ForestConfig`] and [`TrainingConfig`] with their
//! builders, as well as the [`MaxFeatures`] strategy.
//!
//! # Example
//!
//! ```
//! use insight_learning::{ForestConfig, MaxFeatures};
//!
//! let config = ForestConfig::builder()
//!     .n_trees(50)
//!     .max_depth(Some(8))
//!     .max_features(MaxFeatures::Sqrt)
//!     .build()
//!     .expect("valid config");
//! ```

use crate::error::LearningError;
use insight_processing::Target;
use serde::{Deserialize, Serialize};

/// How many features each split considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`, at least 1.
    #[default]
    Sqrt,
    /// `floor(log2(n_features))`, at least 1.
    Log2,
    /// Every feature at every split.
    All,
    /// A fixed count, clamped to `1..=n_features`.
    Count(usize),
}

impl MaxFeatures {
    /// Resolve the number of candidate features for a matrix of `n_features` columns.
    #[must_use]
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features.max(1);
        let k = match self {
            MaxFeatures::Sqrt => (n as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n as f64).log2().floor() as usize,
            MaxFeatures::All => n,
            MaxFeatures::Count(count) => count,
        };
        k.clamp(1, n)
    }
}

/// Hyperparameters of a [`RandomForest`](crate::RandomForest).
///
/// # Validation
///
/// [`build()`](ForestConfigBuilder::build) checks that:
/// - `n_trees` is at least 1
/// - `max_depth`, when set, is at least 1
/// - `min_samples_split` is at least 2
/// - `min_samples_leaf` is at least 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the ensemble (default: 100).
    pub n_trees: usize,

    /// Maximum tree depth; `None` grows until leaves are pure (default: `None`).
    pub max_depth: Option<usize>,

    /// Minimum samples a node needs to be split (default: 2).
    pub min_samples_split: usize,

    /// Minimum samples each child of a split must hold (default: 1).
    pub min_samples_leaf: usize,

    /// Candidate features per split (default: [`MaxFeatures::Sqrt`]).
    pub max_features: MaxFeatures,

    /// Whether each tree is fit on a bootstrap resample (default: true).
    pub bootstrap: bool,

    /// Seed for bootstrap and feature sampling (default: 42).
    ///
    /// Tree `i` draws from a generator seeded with `random_seed + i`.
    pub random_seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            random_seed: 42,
        }
    }
}

impl ForestConfig {
    /// Create a new builder for `ForestConfig`.
    #[must_use]
    pub fn builder() -> ForestConfigBuilder {
        ForestConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), LearningError> {
        if self.n_trees == 0 {
            return Err(LearningError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(LearningError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(LearningError::InvalidConfig(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(LearningError::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if let MaxFeatures::Count(0) = self.max_features {
            return Err(LearningError::InvalidConfig(
                "max_features count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ForestConfig`].
#[derive(Debug, Clone, Default)]
pub struct ForestConfigBuilder {
    config: ForestConfig,
}

impl ForestConfigBuilder {
    /// Set the number of trees (default: 100).
    #[must_use]
    pub fn n_trees(mut self, n: usize) -> Self {
        self.config.n_trees = n;
        self
    }

    /// Set the maximum depth (default: unbounded).
    #[must_use]
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_depth = depth;
        self
    }

    #[must_use]
    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.config.min_samples_split = n;
        self
    }

    #[must_use]
    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.config.min_samples_leaf = n;
        self
    }

    #[must_use]
    pub fn max_features(mut self, strategy: MaxFeatures) -> Self {
        self.config.max_features = strategy;
        self
    }

    #[must_use]
    pub fn bootstrap(mut self, enabled: bool) -> Self {
        self.config.bootstrap = enabled;
        self
    }

    /// Set the random seed for reproducibility (default: 42).
    #[must_use]
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// See [`ForestConfig::validate`].
    pub fn build(self) -> Result<ForestConfig, LearningError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration of the per-target training runs.
///
/// Defaults hold out 30% of rows for the automation and salary targets and
/// 10% for the growth target, all split with seed 42.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Forest hyperparameters shared by all three targets.
    pub forest: ForestConfig,

    /// Held-out fraction for [`Target::Automation`] (default: 0.3).
    pub automation_test_size: f64,

    /// Held-out fraction for [`Target::Growth`] (default: 0.1).
    pub growth_test_size: f64,

    /// Held-out fraction for [`Target::Salary`] (default: 0.3).
    pub salary_test_size: f64,

    /// Seed of the train/test shuffle (default: 42).
    pub split_seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            automation_test_size: 0.3,
            growth_test_size: 0.1,
            salary_test_size: 0.3,
            split_seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Create a new builder for `TrainingConfig`.
    #[must_use]
    pub fn builder() -> TrainingConfigBuilder {
        TrainingConfigBuilder::default()
    }

    /// Held-out fraction used for `target`.
    #[must_use]
    pub fn test_size(&self, target: Target) -> f64 {
        match target {
            Target::Automation => self.automation_test_size,
            Target::Growth => self.growth_test_size,
            Target::Salary => self.salary_test_size,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] if a test size is not in
    /// `(0.0, 1.0)` or the forest configuration is invalid.
    pub fn validate(&self) -> Result<(), LearningError> {
        for target in Target::ALL {
            let size = self.test_size(target);
            if size <= 0.0 || size >= 1.0 {
                return Err(LearningError::InvalidConfig(format!(
                    "test_size for {target} must be between 0.0 and 1.0 (exclusive)"
                )));
            }
        }
        self.forest.validate()
    }
}

/// Builder for [`TrainingConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrainingConfigBuilder {
    config: TrainingConfig,
}

impl TrainingConfigBuilder {
    #[must_use]
    pub fn forest(mut self, forest: ForestConfig) -> Self {
        self.config.forest = forest;
        self
    }

    /// Set the held-out fraction for one target.
    #[must_use]
    pub fn test_size(mut self, target: Target, size: f64) -> Self {
        match target {
            Target::Automation => self.config.automation_test_size = size,
            Target::Growth => self.config.growth_test_size = size,
            Target::Salary => self.config.salary_test_size = size,
        }
        self
    }

    #[must_use]
    pub fn split_seed(mut self, seed: u64) -> Self {
        self.config.split_seed = seed;
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// See [`TrainingConfig::validate`].
    pub fn build(self) -> Result<TrainingConfig, LearningError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_forest_config() {
        let config = ForestConfig::default();
        assert_eq!(config.n_trees, 100);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.min_samples_split, 2);
        assert_eq!(config.min_samples_leaf, 1);
        assert_eq!(config.max_features, MaxFeatures::Sqrt);
        assert!(config.bootstrap);
        assert_eq!(config.random_seed, 42);
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(9), 3);
        assert_eq!(MaxFeatures::Sqrt.resolve(10), 3);
        assert_eq!(MaxFeatures::Log2.resolve(9), 3);
        assert_eq!(MaxFeatures::Log2.resolve(1), 1);
        assert_eq!(MaxFeatures::All.resolve(9), 9);
        assert_eq!(MaxFeatures::Count(20).resolve(9), 9);
    }

    #[test]
    fn test_invalid_forest_config() {
        let result = ForestConfig::builder().n_trees(0).build();
        assert!(result.unwrap_err().to_string().contains("n_trees"));

        let result = ForestConfig::builder().min_samples_split(1).build();
        assert!(result.unwrap_err().to_string().contains("min_samples_split"));

        let result = ForestConfig::builder().max_depth(Some(0)).build();
        assert!(result.unwrap_err().to_string().contains("max_depth"));

        let result = ForestConfig::builder()
            .max_features(MaxFeatures::Count(0))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_training_config_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.test_size(Target::Automation), 0.3);
        assert_eq!(config.test_size(Target::Growth), 0.1);
        assert_eq!(config.test_size(Target::Salary), 0.3);
        assert_eq!(config.split_seed, 42);
    }

    #[test]
    fn test_invalid_test_size() {
        let result = TrainingConfig::builder()
            .test_size(Target::Growth, 1.0)
            .build();
        let message = result.unwrap_err().to_string();
        assert!(message.contains("test_size for growth"));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "n_trees": 10,
            "max_depth": 5,
            "min_samples_split": 4,
            "min_samples_leaf": 2,
            "max_features": "all",
            "bootstrap": false,
            "random_seed": 7
        }"#;
        let config: ForestConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_depth, Some(5));
        assert_eq!(config.max_features, MaxFeatures::All);
        assert!(config.validate().is_ok());
    }
}
