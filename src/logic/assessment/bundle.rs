//! Model bundle: transformer and classifier published together

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::constants::{CLASSIFIER_FILE, TRANSFORMER_FILE};
use crate::logic::error::RiskResult;
use crate::logic::features::FeatureTransformer;
use crate::logic::model::RiskClassifier;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    pub transformer: FeatureTransformer,
    pub classifier: RiskClassifier,
    pub created_at: DateTime<Utc>,
}

impl ModelBundle {
    pub fn new(transformer: FeatureTransformer, classifier: RiskClassifier) -> Self {
        Self {
            transformer,
            classifier,
            created_at: Utc::now(),
        }
    }

    /// Writes `transformer.json` and `classifier.json` into `dir`
    pub fn save(&self, dir: &Path) -> RiskResult<()> {
        self.transformer.save(&dir.join(TRANSFORMER_FILE))?;
        self.classifier.save_model(&dir.join(CLASSIFIER_FILE))?;
        Ok(())
    }

    /// Both files must exist and verify
    pub fn load(dir: &Path) -> RiskResult<Self> {
        let transformer = FeatureTransformer::load(&dir.join(TRANSFORMER_FILE))?;
        let classifier = RiskClassifier::load_model(&dir.join(CLASSIFIER_FILE))?;
        Ok(Self::new(transformer, classifier))
    }
}
