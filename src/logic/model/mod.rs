//! Model Module - Risk Classification
//!
//! ## Structure
//! - `tree`: multi-class Gini decision tree (arena nodes)
//! - `forest`: bagged random forest, trees built in parallel
//! - `classifier`: `RiskModel` capability and the record-level `RiskClassifier`
//!
//! ## Usage
//! ```ignore
//! use crate::logic::model::{ForestConfig, RandomForest, RiskClassifier};
//!
//! let mut classifier = RiskClassifier::new(RandomForest::new(ForestConfig::default()));
//! classifier.train(&records, &labels)?;
//! let (level, proba) = classifier.classify(&record)?;
//! ```

pub mod tree;
pub mod forest;
pub mod classifier;


pub use classifier::{RiskClassifier, RiskModel, CLASSIFIER_FEATURES};
pub use forest::{ForestConfig, RandomForest};
