//! Result types returned by training and prediction.

use crate::metrics::{ConfusionMatrix, RankedFeature};
use insight_processing::Target;
use serde::{Deserialize, Serialize};

/// Outcome of training one target.
///
/// # Overfitting Risk
///
/// [`overfitting_risk()`](Self::overfitting_risk) compares train and test
/// accuracy:
/// - `"low"`: gap < 5%
/// - `"medium"`: gap 5-15%
/// - `"high"`: gap > 15%
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// The target this report belongs to.
    pub target: Target,

    /// Accuracy on the rows the forest was fit on.
    pub train_accuracy: f64,

    /// Accuracy on the held-out rows.
    pub test_accuracy: f64,

    pub train_rows: usize,
    pub test_rows: usize,

    /// Rows left out because a feature or the label had no code
    /// (unclassified salaries).
    pub skipped_rows: usize,

    /// Class names in label-index order.
    pub class_names: Vec<String>,

    /// Feature importances, sorted in descending order.
    pub feature_importance: Vec<RankedFeature>,

    /// Confusion matrix over the held-out rows.
    pub confusion: ConfusionMatrix,
}

impl TrainingReport {
    #[must_use]
    pub fn overfitting_risk(&self) -> &'static str {
        let gap = self.train_accuracy - self.test_accuracy;
        if gap < 0.05 {
            "low"
        } else if gap <= 0.15 {
            "medium"
        } else {
            "high"
        }
    }
}

/// Probability assigned to one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

/// A decoded prediction for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub target: Target,

    /// Human-readable class name.
    pub label: String,

    /// Index of `label` in the target's class list.
    pub index: usize,

    /// Every class with its probability, in class-list order.
    pub probabilities: Vec<ClassProbability>,

    /// The encoded feature vector fed to the classifier.
    pub features: Vec<f64>,
}

impl Prediction {
    /// Probability of the predicted class.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.probabilities
            .get(self.index)
            .map_or(0.0, |c| c.probability)
    }
}

/// Summary of a loaded artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub target: Target,
    pub artifact: String,
    pub feature_names: Vec<String>,
    pub class_names: Vec<String>,
    pub n_trees: usize,
    pub test_accuracy: f64,
    pub trained_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(train: f64, test: f64) -> TrainingReport {
        TrainingReport {
            target: Target::Automation,
            train_accuracy: train,
            test_accuracy: test,
            train_rows: 7,
            test_rows: 3,
            skipped_rows: 0,
            class_names: vec!["High".into(), "Low".into(), "Medium".into()],
            feature_importance: Vec::new(),
            confusion: ConfusionMatrix::new(&[], &[], 3),
        }
    }

    #[test]
    fn test_overfitting_risk() {
        assert_eq!(report(0.82, 0.80).overfitting_risk(), "low");
        assert_eq!(report(0.90, 0.80).overfitting_risk(), "medium");
        assert_eq!(report(1.0, 0.40).overfitting_risk(), "high");
    }

    #[test]
    fn test_prediction_confidence() {
        let prediction = Prediction {
            target: Target::Growth,
            label: "Stable".to_string(),
            index: 2,
            probabilities: vec![
                ClassProbability {
                    label: "Decline".to_string(),
                    probability: 0.2,
                },
                ClassProbability {
                    label: "Growth".to_string(),
                    probability: 0.3,
                },
                ClassProbability {
                    label: "Stable".to_string(),
                    probability: 0.5,
                },
            ],
            features: vec![0.0; 9],
        };
        assert_eq!(prediction.confidence(), 0.5);
    }
}
