//! Configuration module
//!
//! Engine configuration loaded from environment variables (after
//! `dotenvy::dotenv()` in the binary), falling back to `constants`.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    default_model_dir, DEFAULT_MAX_DEPTH, DEFAULT_SEED, DEFAULT_TRAIN_RATIO, DEFAULT_TREES,
    ENV_KNOWLEDGE_BASE, ENV_MAX_DEPTH, ENV_MODEL_DIR, ENV_SEED, ENV_TRAIN_RATIO, ENV_TREES,
};
use crate::logic::model::ForestConfig;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding transformer.json / classifier.json
    pub model_dir: PathBuf,

    /// Optional JSON knowledge base; the built-in one is used when absent
    pub knowledge_base: Option<PathBuf>,

    /// Forest hyper-parameters
    pub forest: ForestConfig,

    /// Share of the corpus used for training
    pub train_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            knowledge_base: None,
            forest: ForestConfig::default(),
            train_ratio: DEFAULT_TRAIN_RATIO,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let forest = ForestConfig {
            n_trees: parse_env(ENV_TREES).unwrap_or(DEFAULT_TREES),
            max_depth: parse_env(ENV_MAX_DEPTH).unwrap_or(DEFAULT_MAX_DEPTH),
            seed: parse_env(ENV_SEED).unwrap_or(DEFAULT_SEED),
            ..Default::default()
        };

        let train_ratio = match parse_env::<f64>(ENV_TRAIN_RATIO) {
            Some(ratio) => checked_ratio(ratio),
            None => DEFAULT_TRAIN_RATIO,
        };

        Self {
            model_dir: env::var(ENV_MODEL_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_model_dir()),
            knowledge_base: env::var(ENV_KNOWLEDGE_BASE).ok().map(PathBuf::from),
            forest,
            train_ratio,
        }
    }
}

/// Ratios outside (0, 1) fall back to the default
fn checked_ratio(ratio: f64) -> f64 {
    if ratio > 0.0 && ratio < 1.0 {
        ratio
    } else {
        log::warn!(
            "Ignoring {}={} (must be between 0 and 1), using {}",
            ENV_TRAIN_RATIO,
            ratio,
            DEFAULT_TRAIN_RATIO
        );
        DEFAULT_TRAIN_RATIO
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.forest.n_trees, DEFAULT_TREES);
        assert_eq!(config.forest.seed, DEFAULT_SEED);
        assert_eq!(config.train_ratio, DEFAULT_TRAIN_RATIO);
        assert!(config.knowledge_base.is_none());
        assert!(config.model_dir.ends_with("models"));
    }

    #[test]
    fn test_train_ratio_outside_unit_interval_falls_back() {
        assert_eq!(checked_ratio(0.7), 0.7);
        assert_eq!(checked_ratio(1.5), DEFAULT_TRAIN_RATIO);
        assert_eq!(checked_ratio(0.0), DEFAULT_TRAIN_RATIO);
        assert_eq!(checked_ratio(-0.2), DEFAULT_TRAIN_RATIO);
    }
}
