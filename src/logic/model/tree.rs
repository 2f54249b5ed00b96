//! Decision Tree - multi-class Gini CART
//!
//! Nodes live in a flat arena (`nodes[0]` is the root). Leaves hold class
//! frequencies, so a tree answers probabilities directly.

use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Growth limits for one tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features tried per split (all when None)
    pub max_features: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        /// Class frequencies, indexed like the forest's class list
        proba: Vec<f64>,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        samples: usize,
    },
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// One fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_classes: usize,
    /// Unnormalized weighted impurity decrease per feature
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `sample` (may repeat for bootstrap).
    /// `labels` are class indices in `0..n_classes`.
    pub fn fit(
        config: &TreeConfig,
        features: ArrayView2<f64>,
        labels: &[usize],
        n_classes: usize,
        sample: Vec<usize>,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let n_features = features.ncols();
        let mut builder = Builder {
            config,
            features,
            labels,
            n_classes,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
            rng,
        };
        builder.grow(sample, 0);

        Self {
            nodes: builder.nodes,
            n_classes,
            importances: builder.importances,
        }
    }

    /// Class probabilities for one row
    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { proba, .. } => return proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Arena indices must point forward and every leaf must match the class count
    pub(crate) fn is_well_formed(&self, n_features: usize) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(id, node)| match node {
                Node::Leaf { proba, .. } => proba.len() == self.n_classes,
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    *feature < n_features
                        && *left > id
                        && *right > id
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
            })
    }
}

// ============================================================================
// BUILDER
// ============================================================================

struct Builder<'a, 'v, 'r> {
    config: &'a TreeConfig,
    features: ArrayView2<'v, f64>,
    labels: &'a [usize],
    n_classes: usize,
    nodes: Vec<Node>,
    importances: Vec<f64>,
    rng: &'r mut ChaCha8Rng,
}

impl Builder<'_, '_, '_> {
    fn grow(&mut self, sample: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&sample);
        let n = sample.len();
        let impurity = gini(&counts, n);

        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || impurity < 1e-12
        {
            return self.leaf(&counts, n);
        }

        let Some(split) = self.best_split(&sample, impurity) else {
            return self.leaf(&counts, n);
        };

        self.importances[split.feature] += split.gain * n as f64;

        let (left, right): (Vec<usize>, Vec<usize>) = sample
            .iter()
            .partition(|&&i| self.features[[i, split.feature]] <= split.threshold);

        // reserve the slot so children get higher ids
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            proba: Vec::new(),
            samples: n,
        });

        let left_id = self.grow(left, depth + 1);
        let right_id = self.grow(right, depth + 1);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: left_id,
            right: right_id,
            samples: n,
        };
        id
    }

    fn leaf(&mut self, counts: &[usize], n: usize) -> usize {
        let total = n.max(1) as f64;
        self.nodes.push(Node::Leaf {
            proba: counts.iter().map(|&c| c as f64 / total).collect(),
            samples: n,
        });
        self.nodes.len() - 1
    }

    fn class_counts(&self, sample: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &i in sample {
            counts[self.labels[i]] += 1;
        }
        counts
    }

    /// Best (feature, threshold) over a random feature subset by sweeping
    /// sorted values once per feature
    fn best_split(&mut self, sample: &[usize], parent_impurity: f64) -> Option<Split> {
        let n_features = self.features.ncols();
        let max_features = self
            .config
            .max_features
            .unwrap_or(n_features)
            .clamp(1, n_features);

        let mut candidates: Vec<usize> = (0..n_features).collect();
        candidates.shuffle(&mut *self.rng);
        candidates.truncate(max_features);

        let n = sample.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let total = self.class_counts(sample);
        let mut best: Option<Split> = None;
        let mut best_gain = 0.0;

        for feature in candidates {
            let mut order = sample.to_vec();
            order.sort_by(|&a, &b| {
                self.features[[a, feature]].total_cmp(&self.features[[b, feature]])
            });

            let mut left = vec![0usize; self.n_classes];
            for pos in 0..n - 1 {
                left[self.labels[order[pos]]] += 1;

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let here = self.features[[order[pos], feature]];
                let next = self.features[[order[pos + 1], feature]];
                if here >= next {
                    continue;
                }

                let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
                let weighted = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n as f64;
                let gain = parent_impurity - weighted;

                if gain > best_gain {
                    let mid = (here + next) / 2.0;
                    best_gain = gain;
                    best = Some(Split {
                        feature,
                        threshold: if mid < next { mid } else { here },
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// Gini impurity of a class histogram
pub fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}
