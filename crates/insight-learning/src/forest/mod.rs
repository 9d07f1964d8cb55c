//! Random forest classification.
//!
//! A hand-rolled ensemble of CART trees ([`DecisionTree`]) grown on Gini
//! impurity with bootstrap resampling and per-split feature subsampling.
//! Everything is driven by seeded generators, so fitting the same data
//! with the same [`ForestConfig`](crate::ForestConfig) yields the same forest.
//!
//! The [`Classifier`] trait is the seam the prediction layer depends on.

mod ensemble;
mod tree;

pub use ensemble::RandomForest;
pub use tree::{DecisionTree, Node, NodeIndex};

use crate::error::{LearningError, Result};

/// A fitted multi-class classifier over dense `f64` feature vectors.
pub trait Classifier: Send + Sync {
    /// Width of the feature vectors the classifier accepts.
    fn n_features(&self) -> usize;

    /// Number of classes; labels are `0..n_classes`.
    fn n_classes(&self) -> usize;

    /// Per-class probabilities for one feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::Inference`] if `x` has the wrong width.
    fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>>;

    /// Label index for one feature vector. Ties go to the lowest index.
    fn predict(&self, x: &[f64]) -> Result<usize> {
        Ok(argmax(&self.predict_proba(x)?))
    }

    /// Non-negative per-feature weights summing to 1.
    fn feature_importances(&self) -> Vec<f64>;

    /// Fraction of rows of `x` whose prediction equals the label in `y`.
    fn score(&self, x: &[Vec<f64>], y: &[usize]) -> Result<f64> {
        if x.len() != y.len() {
            return Err(LearningError::InvalidData(format!(
                "{} rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        let predictions = x
            .iter()
            .map(|row| self.predict(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(crate::metrics::accuracy(&predictions, y))
    }
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_ties_go_low() {
        assert_eq!(argmax(&[0.2, 0.5, 0.3]), 1);
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), 0);
        assert_eq!(argmax(&[0.1, 0.45, 0.45]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
