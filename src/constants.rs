//! Central Configuration Constants
//!
//! Single source of truth for configuration defaults.
//! Environment variables override these through `logic::config`.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "privacy-risk";

/// Default number of trees in the forest
pub const DEFAULT_TREES: usize = 100;

/// Default maximum tree depth
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default random seed for training and corpus generation
pub const DEFAULT_SEED: u64 = 42;

/// Default share of the corpus used for training (rest is validation)
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Default synthetic corpus size
pub const DEFAULT_SAMPLES: usize = 1000;

/// File name of the persisted transformer state inside the model dir
pub const TRANSFORMER_FILE: &str = "transformer.json";

/// File name of the persisted classifier state inside the model dir
pub const CLASSIFIER_FILE: &str = "classifier.json";

/// Environment variable names
pub const ENV_MODEL_DIR: &str = "PRIVACY_RISK_MODEL_DIR";
pub const ENV_KNOWLEDGE_BASE: &str = "PRIVACY_RISK_KNOWLEDGE_BASE";
pub const ENV_TREES: &str = "PRIVACY_RISK_TREES";
pub const ENV_MAX_DEPTH: &str = "PRIVACY_RISK_MAX_DEPTH";
pub const ENV_SEED: &str = "PRIVACY_RISK_SEED";
pub const ENV_TRAIN_RATIO: &str = "PRIVACY_RISK_TRAIN_RATIO";

/// Default directory for persisted model state
pub fn default_model_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("models")
}
