//! CART decision tree grown on Gini impurity.

use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// Index of a node in a tree's arena.
pub type NodeIndex = usize;

/// A node of a fitted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Terminal node holding the class distribution of its training samples.
    Leaf { distribution: Vec<f64> },
    /// Samples with `x[feature] <= threshold` go left, the rest go right.
    Split {
        feature: usize,
        threshold: f64,
        left: NodeIndex,
        right: NodeIndex,
    },
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of candidate features drawn at every split.
    pub max_features: usize,
}

/// A fitted classification tree. The root is node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    n_classes: usize,
    /// Total weighted impurity decrease per feature, unnormalized.
    impurity_decrease: Vec<f64>,
}

/// Gini impurity of a class histogram holding `n` samples.
pub(crate) fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    /// `n_left * gini_left + n_right * gini_right`.
    weighted_impurity: f64,
}

impl DecisionTree {
    /// Grow a tree over the rows of `x` listed in `samples`.
    ///
    /// `samples` may repeat rows (bootstrap). Inputs are assumed validated
    /// by the caller: rectangular, finite, labels below `n_classes`.
    pub(crate) fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        samples: Vec<usize>,
        n_classes: usize,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let mut tree = Self {
            nodes: Vec::new(),
            n_features,
            n_classes,
            impurity_decrease: vec![0.0; n_features],
        };
        let mut builder = Builder {
            x,
            y,
            params,
            rng,
        };
        builder.grow(&mut tree, samples, 0);
        tree
    }

    /// Class distribution of the leaf `row` falls into.
    pub fn leaf_distribution(&self, row: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Impurity-based importances of this tree, normalized to sum to 1.
    ///
    /// All zeros if the tree never split.
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.impurity_decrease.iter().sum();
        if total <= 0.0 {
            return vec![0.0; self.n_features];
        }
        self.impurity_decrease.iter().map(|v| v / total).collect()
    }

    /// Check the arena describes a tree over `n_features` inputs and
    /// `n_classes` labels.
    ///
    /// Children must come after their parent, which rules out cycles, and
    /// every leaf must hold a finite distribution of `n_classes` entries.
    pub(crate) fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.n_features != n_features || self.n_classes != n_classes {
            return Err(format!(
                "tree expects {} features and {} classes",
                self.n_features, self.n_classes
            ));
        }
        if self.impurity_decrease.len() != n_features {
            return Err(format!(
                "tree has {} importance weights for {n_features} features",
                self.impurity_decrease.len()
            ));
        }
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(format!(
                            "leaf {id} has {} class weights, expected {n_classes}",
                            distribution.len()
                        ));
                    }
                    if distribution.iter().any(|p| !p.is_finite() || *p < 0.0) {
                        return Err(format!("leaf {id} has an invalid class weight"));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "split {id} tests feature {feature} of {n_features}"
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("split {id} has no threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= self.nodes.len() {
                            return Err(format!(
                                "split {id} points to node {child} of {}",
                                self.nodes.len()
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: NodeIndex) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

struct Builder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    params: TreeParams,
    rng: &'a mut StdRng,
}

impl Builder<'_> {
    fn grow(&mut self, tree: &mut DecisionTree, samples: Vec<usize>, depth: usize) -> NodeIndex {
        let n = samples.len();
        let counts = self.class_counts(&samples, tree.n_classes);
        let distribution: Vec<f64> = counts.iter().map(|&c| c as f64 / n as f64).collect();
        let impurity = gini(&counts, n);

        let id = tree.nodes.len();
        tree.nodes.push(Node::Leaf { distribution });

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached || n < self.params.min_samples_split || impurity <= 0.0 {
            return id;
        }

        let Some(best) = self.best_split(&samples, tree.n_features, tree.n_classes) else {
            return id;
        };

        tree.impurity_decrease[best.feature] += n as f64 * impurity - best.weighted_impurity;

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.x[i][best.feature] <= best.threshold);

        let left = self.grow(tree, left_samples, depth + 1);
        let right = self.grow(tree, right_samples, depth + 1);
        tree.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn class_counts(&self, samples: &[usize], n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; n_classes];
        for &i in samples {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn best_split(
        &mut self,
        samples: &[usize],
        n_features: usize,
        n_classes: usize,
    ) -> Option<BestSplit> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf;
        let k = self.params.max_features.min(n_features);
        let candidates = index::sample(&mut *self.rng, n_features, k);

        let mut best: Option<BestSplit> = None;
        let mut sorted = samples.to_vec();
        for feature in candidates.iter() {
            sorted.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let mut left = vec![0usize; n_classes];
            let mut right = self.class_counts(&sorted, n_classes);
            for pos in 1..n {
                let moved = self.y[sorted[pos - 1]];
                left[moved] += 1;
                right[moved] -= 1;

                let lo = self.x[sorted[pos - 1]][feature];
                let hi = self.x[sorted[pos]][feature];
                if lo == hi || pos < min_leaf || n - pos < min_leaf {
                    continue;
                }

                let weighted =
                    pos as f64 * gini(&left, pos) + (n - pos) as f64 * gini(&right, n - pos);
                if best.as_ref().is_none_or(|b| weighted < b.weighted_impurity) {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(BestSplit {
                        feature,
                        // Adjacent floats can round the midpoint up to `hi`.
                        threshold: if mid < hi { mid } else { lo },
                        weighted_impurity: weighted,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 2,
        }
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert_eq!(gini(&[2, 2], 4), 0.5);
        assert_eq!(gini(&[], 0), 0.0);
    }

    #[test]
    fn test_fits_separable_data() {
        let x = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![8.0, 0.0], vec![9.0, 0.0]];
        let y = vec![0, 0, 1, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, (0..4).collect(), 2, params(), &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.leaf_distribution(&[0.0, 0.0]), &[1.0, 0.0]);
        assert_eq!(tree.leaf_distribution(&[10.0, 0.0]), &[0.0, 1.0]);
        match &tree.nodes()[0] {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 0);
                assert_eq!(*threshold, 5.0);
            }
            other => panic!("expected split, got {other:?}"),
        }
        assert_eq!(tree.feature_importances(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let x = vec![vec![1.0], vec![2.0]];
        let y = vec![1, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, vec![0, 1], 2, params(), &mut rng);
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.feature_importances(), vec![0.0]);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let y = vec![0, 1, 0, 1, 0, 1, 0, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let limited = TreeParams {
            max_depth: Some(2),
            ..params()
        };
        let tree = DecisionTree::fit(&x, &y, (0..8).collect(), 2, limited, &mut rng);
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let x: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let y = vec![1, 0, 0, 0, 0, 0];
        let mut rng = StdRng::seed_from_u64(0);
        let constrained = TreeParams {
            min_samples_leaf: 2,
            ..params()
        };
        let tree = DecisionTree::fit(&x, &y, (0..6).collect(), 2, constrained, &mut rng);
        // The only pure cut isolates a single row, which is not allowed.
        for node in tree.nodes() {
            if let Node::Split { threshold, .. } = node {
                assert!(*threshold > 1.0);
            }
        }
    }

    #[test]
    fn test_constant_feature_never_splits() {
        let x = vec![vec![3.0], vec![3.0], vec![3.0]];
        let y = vec![0, 1, 0];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, vec![0, 1, 2], 2, params(), &mut rng);
        assert_eq!(tree.nodes().len(), 1);
        let dist = tree.leaf_distribution(&[3.0]);
        assert!((dist[0] - 2.0 / 3.0).abs() < 1e-12);
    }
}
