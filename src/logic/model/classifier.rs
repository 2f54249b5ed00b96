//! Risk Classifier
//!
//! Record-level classifier. Keeps its own encoders for device type, data
//! type and location type, independent from the feature transformer, and
//! feeds a compact 7-column vector to any `RiskModel`.

use std::collections::BTreeSet;
use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::forest::RandomForest;
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::CategoryEncoding;
use crate::logic::record::{BooleanField, CategoricalField, FeatureSource, NumericField, RiskLevel};
use crate::logic::storage;

/// Blob kind / version for persisted classifier state
pub const CLASSIFIER_KIND: &str = "risk_classifier";
pub const CLASSIFIER_FORMAT: u32 = 1;

/// Classifier input columns, in order
pub const CLASSIFIER_FEATURES: [&str; 7] = [
    "device_type",
    "data_type",
    "location_type",
    "access_frequency",
    "user_consent",
    "network_security_level",
    "data_sensitivity",
];

const ENCODED_FIELDS: [CategoricalField; 3] = [
    CategoricalField::DeviceType,
    CategoricalField::DataType,
    CategoricalField::LocationType,
];

// ============================================================================
// MODEL CAPABILITY
// ============================================================================

/// Matrix-level probabilistic multi-class model
pub trait RiskModel: Send + Sync + Serialize + DeserializeOwned {
    /// Blob kind when persisted on its own
    const KIND: &'static str;

    fn train(&mut self, features: ArrayView2<f64>, labels: &[RiskLevel]) -> RiskResult<()>;

    /// One row per sample, one column per entry of `classes()`
    fn predict_proba(&self, features: ArrayView2<f64>) -> RiskResult<Array2<f64>>;

    /// Training labels, ascending
    fn classes(&self) -> &[RiskLevel];

    fn is_trained(&self) -> bool;

    /// Structural check after deserialization
    fn check_integrity(&self) -> RiskResult<()> {
        Ok(())
    }

    /// Argmax of `predict_proba`; ties go to the lower label
    fn predict(&self, features: ArrayView2<f64>) -> RiskResult<Vec<RiskLevel>> {
        let proba = self.predict_proba(features)?;
        let classes = self.classes();
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| classes[argmax(row)])
            .collect())
    }

    fn save(&self, path: &Path) -> RiskResult<()> {
        storage::write_blob(path, &storage::encode_blob(Self::KIND, 1, self)?)
    }

    fn load(path: &Path) -> RiskResult<Self>
    where
        Self: Sized,
    {
        let model: Self = storage::decode_blob(Self::KIND, 1, &storage::read_blob(path)?)?;
        model.check_integrity()?;
        Ok(model)
    }
}

/// First index of the maximum
fn argmax(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, p) in row.iter().enumerate() {
        if *p > row[best] {
            best = i;
        }
    }
    best
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ClassifierState<M> {
    encoders: Vec<CategoryEncoding>,
    model: M,
}

/// Record-level risk classifier
#[derive(Debug, Clone, PartialEq)]
pub struct RiskClassifier<M: RiskModel = RandomForest> {
    encoders: Option<Vec<CategoryEncoding>>,
    model: M,
}

impl<M: RiskModel> RiskClassifier<M> {
    pub fn new(model: M) -> Self {
        Self {
            encoders: None,
            model,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn is_trained(&self) -> bool {
        self.encoders.is_some() && self.model.is_trained()
    }

    /// Labels the model can output, ascending
    pub fn classes(&self) -> &[RiskLevel] {
        self.model.classes()
    }

    /// Fit the encoders on `records`, then train the model
    pub fn train<S: FeatureSource>(&mut self, records: &[S], labels: &[RiskLevel]) -> RiskResult<()> {
        if records.is_empty() {
            return Err(RiskError::EmptyCorpus);
        }
        if records.len() != labels.len() {
            return Err(RiskError::LengthMismatch {
                features: records.len(),
                labels: labels.len(),
            });
        }

        let mut encoders = Vec::with_capacity(ENCODED_FIELDS.len());
        for field in ENCODED_FIELDS {
            let values = records
                .iter()
                .map(|r| r.category(field).map(str::to_string))
                .collect::<RiskResult<BTreeSet<String>>>()?;
            encoders.push(CategoryEncoding::fit(field, values));
        }

        let matrix = Self::encode_with(&encoders, records)?;
        self.model.train(matrix.view(), labels)?;
        self.encoders = Some(encoders);
        Ok(())
    }

    /// Classifier input matrix (`CLASSIFIER_FEATURES` columns)
    pub fn encode<S: FeatureSource>(&self, records: &[S]) -> RiskResult<Array2<f64>> {
        let encoders = self
            .encoders
            .as_ref()
            .ok_or(RiskError::NotFitted("risk classifier"))?;
        Self::encode_with(encoders, records)
    }

    fn encode_with<S: FeatureSource>(
        encoders: &[CategoryEncoding],
        records: &[S],
    ) -> RiskResult<Array2<f64>> {
        let mut matrix = Array2::<f64>::zeros((records.len(), CLASSIFIER_FEATURES.len()));
        for (r, record) in records.iter().enumerate() {
            for (c, encoder) in encoders.iter().enumerate() {
                matrix[[r, c]] = encoder.code(record.category(encoder.field)?)? as f64;
            }
            matrix[[r, 3]] = record.number(NumericField::AccessFrequency)?;
            matrix[[r, 4]] = if record.flag(BooleanField::UserConsent)? { 1.0 } else { 0.0 };
            matrix[[r, 5]] = record.number(NumericField::NetworkSecurityLevel)?;
            matrix[[r, 6]] = record.number(NumericField::DataSensitivity)?;
        }
        Ok(matrix)
    }

    pub fn predict<S: FeatureSource>(&self, records: &[S]) -> RiskResult<Vec<RiskLevel>> {
        let matrix = self.encode(records)?;
        self.model.predict(matrix.view())
    }

    /// Rows sum to 1; columns follow `classes()`
    pub fn predict_proba<S: FeatureSource>(&self, records: &[S]) -> RiskResult<Array2<f64>> {
        let matrix = self.encode(records)?;
        self.model.predict_proba(matrix.view())
    }

    /// Predicted level plus a probability for every level 1-5
    /// (zero for levels absent from training)
    pub fn classify<S: FeatureSource>(
        &self,
        record: &S,
    ) -> RiskResult<(RiskLevel, [f64; RiskLevel::COUNT])> {
        let proba = self.predict_proba(std::slice::from_ref(record))?;
        let row = proba.row(0);

        let mut full = [0.0; RiskLevel::COUNT];
        for (level, p) in self.classes().iter().zip(row.iter()) {
            full[level.index()] = *p;
        }

        let level = self
            .classes()
            .get(argmax(row))
            .copied()
            .ok_or(RiskError::NotFitted("risk classifier"))?;
        Ok((level, full))
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    pub fn save_state(&self) -> RiskResult<Vec<u8>> {
        let encoders = self
            .encoders
            .as_ref()
            .ok_or(RiskError::NotFitted("risk classifier"))?;
        let state = ClassifierState {
            encoders: encoders.clone(),
            model: &self.model,
        };
        storage::encode_blob(CLASSIFIER_KIND, CLASSIFIER_FORMAT, &state)
    }

    pub fn load_state(blob: &[u8]) -> RiskResult<Self> {
        let state: ClassifierState<M> =
            storage::decode_blob(CLASSIFIER_KIND, CLASSIFIER_FORMAT, blob)?;

        let fields_ok = state
            .encoders
            .iter()
            .map(|e| e.field)
            .eq(ENCODED_FIELDS.iter().copied());
        if !fields_ok || !state.model.is_trained() {
            return Err(RiskError::CorruptState(
                "risk classifier state incomplete".to_string(),
            ));
        }
        state.model.check_integrity()?;

        Ok(Self {
            encoders: Some(state.encoders),
            model: state.model,
        })
    }

    pub fn save_model(&self, path: &Path) -> RiskResult<()> {
        storage::write_blob(path, &self.save_state()?)
    }

    pub fn load_model(path: &Path) -> RiskResult<Self> {
        let classifier = Self::load_state(&storage::read_blob(path)?)?;
        log::info!("Loaded risk classifier from {}", path.display());
        Ok(classifier)
    }
}

impl RiskClassifier<RandomForest> {
    /// Input column name with its normalized importance, largest first
    pub fn feature_importances(&self) -> Vec<(&'static str, f64)> {
        let mut ranked: Vec<(&'static str, f64)> = CLASSIFIER_FEATURES
            .iter()
            .copied()
            .zip(self.model.feature_importances().iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

impl Default for RiskClassifier<RandomForest> {
    fn default() -> Self {
        Self::new(RandomForest::default())
    }
}
