//! Bagged CART forest for binary classification.
//!
//! Trees are grown on bootstrap samples with Gini impurity, trying a random
//! subset of sqrt(n_features) features per split. The forest probability is
//! the mean positive ratio of the leaves a row lands in.

use crate::error::InferenceError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        positive_ratio: f64,
    },
    Split {
        feature: usize,
        /// Rows with `value <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single CART tree stored as an arena; the root is node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

impl DecisionTree {
    fn fit(rows: &[Vec<f64>], labels: &[bool], sample: Vec<usize>, params: &ForestParams, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
        let max_features = ((n_features as f64).sqrt() as usize).max(1);
        tree.grow(rows, labels, sample, 0, n_features, max_features, params, rng);
        tree
    }

    #[allow(clippy::too_many_arguments)]
    fn grow(
        &mut self,
        rows: &[Vec<f64>],
        labels: &[bool],
        sample: Vec<usize>,
        depth: usize,
        n_features: usize,
        max_features: usize,
        params: &ForestParams,
        rng: &mut StdRng,
    ) -> usize {
        let total = sample.len();
        let positives = sample.iter().filter(|&&i| labels[i]).count();
        let positive_ratio = if total == 0 { 0.0 } else { positives as f64 / total as f64 };

        let pure = positives == 0 || positives == total;
        if pure || depth >= params.max_depth || total < params.min_samples_split {
            return self.push(Node::Leaf { positive_ratio });
        }

        let Some(split) = best_split(rows, labels, &sample, n_features, max_features, rng) else {
            return self.push(Node::Leaf { positive_ratio });
        };

        let (left_sample, right_sample): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| rows[i][split.feature] <= split.threshold);

        let id = self.push(Node::Leaf { positive_ratio });
        let left = self.grow(rows, labels, left_sample, depth + 1, n_features, max_features, params, rng);
        let right = self.grow(rows, labels, right_sample, depth + 1, n_features, max_features, params, rng);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Positive ratio of the leaf `row` falls into.
    fn leaf_ratio(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { positive_ratio }) => return *positive_ratio,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    id = if value <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Lowest weighted Gini split over a random feature subset. Features beyond
/// the subset are tried only while no valid split has been found.
fn best_split(
    rows: &[Vec<f64>],
    labels: &[bool],
    sample: &[usize],
    n_features: usize,
    max_features: usize,
    rng: &mut StdRng,
) -> Option<SplitCandidate> {
    let mut features: Vec<usize> = (0..n_features).collect();
    features.shuffle(rng);

    let total = sample.len();
    let total_pos = sample.iter().filter(|&&i| labels[i]).count();
    let mut best: Option<SplitCandidate> = None;

    for (tried, &feature) in features.iter().enumerate() {
        if tried >= max_features && best.is_some() {
            break;
        }

        let mut column: Vec<(f64, bool)> = sample.iter().map(|&i| (rows[i][feature], labels[i])).collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_pos = 0;
        for k in 0..total - 1 {
            if column[k].1 {
                left_pos += 1;
            }
            let (value, next) = (column[k].0, column[k + 1].0);
            if value >= next {
                continue;
            }
            let left_n = k + 1;
            let right_n = total - left_n;
            let impurity = (left_n as f64 * gini(left_pos, left_n)
                + right_n as f64 * gini(total_pos - left_pos, right_n))
                / total as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mut threshold = (value + next) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}

/// Bagged ensemble of [`DecisionTree`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    positives: usize,
    negatives: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on `rows` (all of equal width) and their labels.
    pub fn fit(rows: &[Vec<f64>], labels: &[bool], params: &ForestParams) -> Self {
        let n = rows.len().min(labels.len());
        let positives = labels[..n].iter().filter(|&&l| l).count();
        let mut master = StdRng::seed_from_u64(params.seed);

        let trees = if n == 0 {
            Vec::new()
        } else {
            (0..params.n_trees)
                .map(|_| {
                    let mut rng = StdRng::seed_from_u64(master.gen());
                    let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                    DecisionTree::fit(&rows[..n], &labels[..n], sample, params, &mut rng)
                })
                .collect()
        };

        Self {
            n_features: rows.first().map(|r| r.len()).unwrap_or(0),
            positives,
            negatives: n - positives,
            trees,
        }
    }

    /// Probability that `row` belongs to the positive class.
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::FeatureMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }
        if self.positives == 0 || self.negatives == 0 || self.trees.is_empty() {
            return Err(InferenceError::DegenerateModel);
        }
        let sum: f64 = self.trees.iter().map(|t| t.leaf_ratio(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// Class prediction at the 0.5 threshold (ties are negative).
    pub fn predict(&self, row: &[f64]) -> Result<bool, InferenceError> {
        Ok(self.predict_proba(row)? > 0.5)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}
