//! Evaluation metrics and feature ranking.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fraction of positions where `predicted` equals `actual`; 0.0 when empty.
pub fn accuracy(predicted: &[usize], actual: &[usize]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / actual.len() as f64
}

/// Counts indexed as `counts[actual][predicted]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn new(predicted: &[usize], actual: &[usize], n_classes: usize) -> Self {
        let mut counts = vec![vec![0; n_classes]; n_classes];
        for (&p, &a) in predicted.iter().zip(actual) {
            if p < n_classes && a < n_classes {
                counts[a][p] += 1;
            }
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.counts.len()).map(|i| self.counts[i][i]).sum()
    }
}

/// A feature with its importance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFeature {
    pub name: String,
    pub importance: f64,
}

/// Pair names with weights and sort by weight, largest first.
///
/// Equal weights keep their input order.
pub fn rank_importances(names: &[String], weights: &[f64]) -> Vec<RankedFeature> {
    let mut ranked: Vec<RankedFeature> = names
        .iter()
        .zip(weights)
        .map(|(name, &importance)| RankedFeature {
            name: name.clone(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

/// Two-column frame (`Feature`, `Importance`) for tabular display.
pub fn importance_frame(ranked: &[RankedFeature]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = ranked.iter().map(|f| f.name.as_str()).collect();
    let weights: Vec<f64> = ranked.iter().map(|f| f.importance).collect();
    df!(
        "Feature" => names,
        "Importance" => weights
    )
}
