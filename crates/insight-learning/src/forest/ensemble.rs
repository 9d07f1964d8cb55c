use super::Classifier;
use super::tree::{DecisionTree, TreeParams};
use crate::config::ForestConfig;
use crate::error::{LearningError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An ensemble of Gini trees voting by averaged leaf distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
    importances: Vec<f64>,
}

impl RandomForest {
    /// Fit a forest on the rows of `x` labelled by `y`.
    ///
    /// # Errors
    ///
    /// - [`LearningError::InvalidConfig`] if `config` does not validate
    /// - [`LearningError::InvalidData`] if `x` is empty or ragged, contains
    ///   non-finite values, disagrees with `y` in length, or a label is not
    ///   below `n_classes`
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        config: &ForestConfig,
    ) -> Result<Self> {
        config.validate()?;
        let n_features = validate_training_data(x, y, n_classes)?;

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features.resolve(n_features),
        };

        let n = x.len();
        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.random_seed.wrapping_add(t as u64));
                let samples = if config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(x, y, samples, n_classes, params, &mut rng)
            })
            .collect();

        let importances = average_importances(&trees, n_features);
        debug!(
            "Fitted {} trees on {} rows x {} features ({} classes)",
            trees.len(),
            n,
            n_features,
            n_classes
        );

        Ok(Self {
            config: config.clone(),
            n_features,
            n_classes,
            trees,
            importances,
        })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Check the structure of a deserialized forest before it is used.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidData`] if the forest has no trees,
    /// its importances do not cover every feature, or any tree is malformed
    /// (see [`DecisionTree`] node rules).
    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 || self.n_classes == 0 {
            return Err(LearningError::InvalidData(format!(
                "forest expects {} features and {} classes",
                self.n_features, self.n_classes
            )));
        }
        if self.trees.is_empty() {
            return Err(LearningError::InvalidData("forest has no trees".to_string()));
        }
        if self.importances.len() != self.n_features {
            return Err(LearningError::InvalidData(format!(
                "forest has {} importances for {} features",
                self.importances.len(),
                self.n_features
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|reason| LearningError::InvalidData(format!("tree {i}: {reason}")))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.n_features {
            return Err(LearningError::Inference(format!(
                "expected {} features, got {}",
                self.n_features,
                x.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(LearningError::Inference("forest has no trees".to_string()));
        }
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, d) in proba.iter_mut().zip(tree.leaf_distribution(x)) {
                *p += d;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    fn feature_importances(&self) -> Vec<f64> {
        self.importances.clone()
    }
}

/// Mean of the per-tree importances, renormalized; uniform if no tree split.
fn average_importances(trees: &[DecisionTree], n_features: usize) -> Vec<f64> {
    let mut sum = vec![0.0; n_features];
    for tree in trees {
        for (s, v) in sum.iter_mut().zip(tree.feature_importances()) {
            *s += v;
        }
    }
    let total: f64 = sum.iter().sum();
    if total <= 0.0 {
        return vec![1.0 / n_features as f64; n_features];
    }
    sum.into_iter().map(|v| v / total).collect()
}

fn validate_training_data(x: &[Vec<f64>], y: &[usize], n_classes: usize) -> Result<usize> {
    if x.is_empty() {
        return Err(LearningError::InvalidData("empty design matrix".to_string()));
    }
    if x.len() != y.len() {
        return Err(LearningError::InvalidData(format!(
            "{} rows but {} labels",
            x.len(),
            y.len()
        )));
    }
    if n_classes == 0 {
        return Err(LearningError::InvalidData(
            "at least one class is required".to_string(),
        ));
    }
    let n_features = x[0].len();
    if n_features == 0 {
        return Err(LearningError::InvalidData("rows have no features".to_string()));
    }
    for (i, row) in x.iter().enumerate() {
        if row.len() != n_features {
            return Err(LearningError::InvalidData(format!(
                "row {i} has {} features, expected {n_features}",
                row.len()
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(LearningError::InvalidData(format!(
                "row {i} contains a non-finite value"
            )));
        }
    }
    if let Some(label) = y.iter().find(|&&label| label >= n_classes) {
        return Err(LearningError::InvalidData(format!(
            "label {label} is not below the class count {n_classes}"
        )));
    }
    Ok(n_features)
}

static_assertions::assert_impl_all!(RandomForest: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    /// Two noisy clusters along feature 0; feature 1 is noise.
    fn clusters() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            let noise = (i * 7 % 5) as f64;
            x.push(vec![i as f64 * 0.1, noise]);
            y.push(0);
            x.push(vec![10.0 + i as f64 * 0.1, noise]);
            y.push(1);
        }
        (x, y)
    }

    fn small_config() -> ForestConfig {
        ForestConfig::builder().n_trees(15).build().unwrap()
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        assert_eq!(forest.predict(&[0.5, 1.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[11.0, 1.0]).unwrap(), 1);
        assert_eq!(forest.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        let proba = forest.predict_proba(&[5.0, 2.0]).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_importances_sum_to_one() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        let importances = forest.feature_importances();
        assert!(importances.iter().all(|v| *v >= 0.0));
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_uniform_importances_without_splits() {
        let x = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let y = vec![1, 1];
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        assert_eq!(forest.feature_importances(), vec![1.0 / 3.0; 3]);
        assert_eq!(forest.predict(&[0.0, 0.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = clusters();
        let a = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        let b = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_width_is_inference_error() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        let err = forest.predict(&[1.0]).unwrap_err();
        assert_eq!(err.error_code(), "INFERENCE_ERROR");
    }

    #[test]
    fn test_invalid_training_data() {
        let config = small_config();
        assert!(RandomForest::fit(&[], &[], 2, &config).is_err());
        assert!(RandomForest::fit(&[vec![1.0]], &[0, 1], 2, &config).is_err());
        assert!(RandomForest::fit(&[vec![1.0], vec![1.0, 2.0]], &[0, 1], 2, &config).is_err());
        assert!(RandomForest::fit(&[vec![f64::NAN]], &[0], 2, &config).is_err());
        let err = RandomForest::fit(&[vec![1.0]], &[3], 2, &config).unwrap_err();
        assert!(err.to_string().contains("label 3"));
    }

    #[test]
    fn test_fitted_forest_validates() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        forest.validate().unwrap();
    }

    fn edited(forest: &RandomForest, edit: impl FnOnce(&mut serde_json::Value)) -> RandomForest {
        let mut json = serde_json::to_value(forest).unwrap();
        edit(&mut json);
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_validate_rejects_malformed_trees() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();

        let empty = edited(&forest, |f| f["trees"] = serde_json::json!([]));
        assert!(empty.validate().unwrap_err().to_string().contains("no trees"));

        let dangling = edited(&forest, |f| {
            f["trees"][0]["nodes"][0] = serde_json::json!({
                "kind": "split", "feature": 0, "threshold": 0.5, "left": 999, "right": 999
            })
        });
        assert!(dangling.validate().unwrap_err().to_string().contains("node 999"));

        let self_loop = edited(&forest, |f| {
            f["trees"][0]["nodes"][0] = serde_json::json!({
                "kind": "split", "feature": 0, "threshold": 0.5, "left": 0, "right": 0
            })
        });
        assert!(self_loop.validate().is_err());

        let bad_feature = edited(&forest, |f| f["trees"][0]["nodes"][0]["feature"] = 7.into());
        assert!(bad_feature.validate().unwrap_err().to_string().contains("feature 7"));

        let short_leaf = edited(&forest, |f| {
            let nodes = f["trees"][0]["nodes"].as_array_mut().unwrap();
            let last = nodes.last_mut().unwrap();
            last["distribution"] = serde_json::json!([1.0]);
        });
        assert!(short_leaf.validate().unwrap_err().to_string().contains("class weights"));
    }

    #[test]
    fn test_serde_round_trip_predicts_identically() {
        let (x, y) = clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForest = serde_json::from_str(&json).unwrap();
        for row in &x {
            assert_eq!(
                restored.predict_proba(row).unwrap(),
                forest.predict_proba(row).unwrap()
            );
        }
    }
}
