//! Random Forest - bagged Gini trees with probability averaging

use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::classifier::RiskModel;
use super::tree::{DecisionTree, TreeConfig};
use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_SEED, DEFAULT_TREES};
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::record::RiskLevel;

/// Random forest hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features tried per split (ceil of sqrt of total if None)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Tree `i` is seeded with `seed + i`
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: DEFAULT_SEED,
        }
    }
}

/// Random forest classifier over risk levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    /// Labels seen in training, ascending; probability column order
    classes: Vec<RiskLevel>,
    n_features: usize,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            classes: Vec::new(),
            n_features: 0,
            trees: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Normalized impurity decrease per input column
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    fn check_width(&self, features: &ArrayView2<f64>) -> RiskResult<()> {
        if features.ncols() != self.n_features {
            return Err(RiskError::WidthMismatch {
                expected: self.n_features,
                actual: features.ncols(),
            });
        }
        Ok(())
    }

    fn proba_row(&self, row: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(row)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl RiskModel for RandomForest {
    const KIND: &'static str = "random_forest";

    fn train(&mut self, features: ArrayView2<f64>, labels: &[RiskLevel]) -> RiskResult<()> {
        if features.nrows() == 0 {
            return Err(RiskError::EmptyCorpus);
        }
        if features.nrows() != labels.len() {
            return Err(RiskError::LengthMismatch {
                features: features.nrows(),
                labels: labels.len(),
            });
        }
        if self.config.n_trees == 0 {
            return Err(RiskError::InvalidValue {
                field: "n_trees",
                value: "0".to_string(),
            });
        }

        let mut classes = labels.to_vec();
        classes.sort();
        classes.dedup();
        let targets: Vec<usize> = labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or_default())
            .collect();

        let n_samples = features.nrows();
        let n_features = features.ncols();
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(
                self.config
                    .max_features
                    .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize),
            ),
        };
        let n_classes = classes.len();
        let bootstrap = self.config.bootstrap;
        let seed = self.config.seed;

        let trees: Vec<DecisionTree> = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
                let sample: Vec<usize> = if bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                DecisionTree::fit(&tree_config, features, &targets, n_classes, sample, &mut rng)
            })
            .collect();

        // per-tree importances are summed then normalized
        let mut importances = vec![0.0; n_features];
        for tree in &trees {
            for (acc, imp) in importances.iter_mut().zip(tree.importances()) {
                *acc += imp;
            }
        }
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            importances.iter_mut().for_each(|imp| *imp /= sum);
        }

        log::info!(
            "Trained random forest: {} trees, {} samples, {} features, classes {:?}",
            trees.len(),
            n_samples,
            n_features,
            classes.iter().map(RiskLevel::value).collect::<Vec<_>>()
        );

        self.classes = classes;
        self.n_features = n_features;
        self.trees = trees;
        self.feature_importances = importances;
        Ok(())
    }

    fn predict_proba(&self, features: ArrayView2<f64>) -> RiskResult<Array2<f64>> {
        if !self.is_trained() {
            return Err(RiskError::NotFitted("random forest"));
        }
        self.check_width(&features)?;

        let rows: Vec<Vec<f64>> = (0..features.nrows())
            .into_par_iter()
            .map(|r| {
                let row: Vec<f64> = features.row(r).iter().copied().collect();
                self.proba_row(&row)
            })
            .collect();

        let mut proba = Array2::<f64>::zeros((rows.len(), self.classes.len()));
        for (r, row) in rows.iter().enumerate() {
            for (c, p) in row.iter().enumerate() {
                proba[[r, c]] = *p;
            }
        }
        Ok(proba)
    }

    fn classes(&self) -> &[RiskLevel] {
        &self.classes
    }

    fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }

    fn check_integrity(&self) -> RiskResult<()> {
        let trees_ok = self
            .trees
            .iter()
            .all(|t| t.n_classes() == self.classes.len() && t.is_well_formed(self.n_features));
        let classes_sorted = self.classes.windows(2).all(|w| w[0] < w[1]);

        if !trees_ok || !classes_sorted || self.trees.is_empty() {
            return Err(RiskError::CorruptState(
                "random forest structure is inconsistent".to_string(),
            ));
        }
        Ok(())
    }
}
