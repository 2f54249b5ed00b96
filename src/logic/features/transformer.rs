//! Feature Transformer
//!
//! Fits per-field encoding tables and scaling statistics on a corpus, then
//! maps records to fixed-width numeric rows in `FEATURE_LAYOUT` order.
//! Fitted state is frozen: `transform` never learns new categories.

use std::collections::BTreeSet;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::{LayoutInfo, BOOLEAN_OFFSET, FEATURE_COUNT, FEATURE_LAYOUT, NUMERIC_OFFSET};
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::record::{BooleanField, CategoricalField, FeatureSource, NumericField};
use crate::logic::storage;

/// Blob kind for persisted transformer state
pub const TRANSFORMER_KIND: &str = "feature_transformer";

/// Blob format version
pub const TRANSFORMER_FORMAT: u32 = 1;

// ============================================================================
// FITTED STATE
// ============================================================================

/// Value → code table for one categorical field. Code is the index in
/// `classes`, which is sorted ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoding {
    pub field: CategoricalField,
    pub classes: Vec<String>,
}

impl CategoryEncoding {
    pub(crate) fn fit(field: CategoricalField, values: BTreeSet<String>) -> Self {
        Self {
            field,
            classes: values.into_iter().collect(),
        }
    }

    pub fn code(&self, value: &str) -> RiskResult<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| RiskError::UnseenCategory {
                field: self.field.name(),
                value: value.to_string(),
            })
    }
}

/// Standardization statistics for one numeric field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericScaler {
    pub field: NumericField,
    pub mean: f64,
    /// Population standard deviation as observed at fit time
    pub std: f64,
}

impl NumericScaler {
    fn fit(field: NumericField, values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            field,
            mean,
            std: variance.sqrt(),
        }
    }

    pub fn scale(&self, value: f64) -> f64 {
        // constant columns divide by 1
        let std = if self.std > 0.0 { self.std } else { 1.0 };
        (value - self.mean) / std
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedState {
    layout: LayoutInfo,
    samples: usize,
    encoders: Vec<CategoryEncoding>,
    scalers: Vec<NumericScaler>,
}

// ============================================================================
// TRANSFORMER
// ============================================================================

/// Record → feature-row transformer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTransformer {
    state: Option<FittedState>,
}

impl FeatureTransformer {
    /// Empty, unfitted transformer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Learn encoding tables and scaling statistics. Refitting replaces
    /// the previous state.
    pub fn fit<S: FeatureSource>(&mut self, corpus: &[S]) -> RiskResult<()> {
        if corpus.is_empty() {
            return Err(RiskError::EmptyCorpus);
        }

        let mut encoders = Vec::with_capacity(CategoricalField::ALL.len());
        for field in CategoricalField::ALL {
            let mut values = BTreeSet::new();
            for record in corpus.iter().filter(|r| r.has_field(field.name())) {
                values.insert(record.category(field)?.to_string());
            }
            if values.is_empty() {
                return Err(RiskError::MissingField(field.name()));
            }
            encoders.push(CategoryEncoding::fit(field, values));
        }

        let mut scalers = Vec::with_capacity(NumericField::ALL.len());
        for field in NumericField::ALL {
            let values = corpus
                .iter()
                .filter(|r| r.has_field(field.name()))
                .map(|r| r.number(field))
                .collect::<RiskResult<Vec<f64>>>()?;
            if values.is_empty() {
                return Err(RiskError::MissingField(field.name()));
            }
            scalers.push(NumericScaler::fit(field, &values));
        }

        for field in BooleanField::ALL {
            if !corpus.iter().any(|r| r.has_field(field.name())) {
                return Err(RiskError::MissingField(field.name()));
            }
        }

        log::info!(
            "Fitted feature transformer on {} records ({} columns)",
            corpus.len(),
            FEATURE_COUNT
        );

        self.state = Some(FittedState {
            layout: LayoutInfo::current(),
            samples: corpus.len(),
            encoders,
            scalers,
        });
        Ok(())
    }

    /// One row per record, `FEATURE_COUNT` columns
    pub fn transform<S: FeatureSource>(&self, records: &[S]) -> RiskResult<Array2<f64>> {
        let state = self.fitted()?;
        let mut matrix = Array2::<f64>::zeros((records.len(), FEATURE_COUNT));

        for (i, record) in records.iter().enumerate() {
            let row = Self::encode_row(state, record)?;
            matrix.row_mut(i).assign(&ndarray::ArrayView1::from(&row[..]));
        }
        Ok(matrix)
    }

    /// Single-record transform
    pub fn transform_one<S: FeatureSource>(&self, record: &S) -> RiskResult<Vec<f64>> {
        Self::encode_row(self.fitted()?, record)
    }

    pub fn fit_transform<S: FeatureSource>(&mut self, corpus: &[S]) -> RiskResult<Array2<f64>> {
        self.fit(corpus)?;
        self.transform(corpus)
    }

    fn encode_row<S: FeatureSource>(state: &FittedState, record: &S) -> RiskResult<Vec<f64>> {
        let mut row = vec![0.0; FEATURE_COUNT];

        for (i, encoder) in state.encoders.iter().enumerate() {
            row[i] = encoder.code(record.category(encoder.field)?)? as f64;
        }
        for (i, scaler) in state.scalers.iter().enumerate() {
            row[NUMERIC_OFFSET + i] = scaler.scale(record.number(scaler.field)?);
        }
        for (i, field) in BooleanField::ALL.iter().enumerate() {
            row[BOOLEAN_OFFSET + i] = if record.flag(*field)? { 1.0 } else { 0.0 };
        }
        Ok(row)
    }

    fn fitted(&self) -> RiskResult<&FittedState> {
        self.state
            .as_ref()
            .ok_or(RiskError::NotFitted("feature transformer"))
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Output column names
    pub fn feature_names(&self) -> &'static [&'static str] {
        FEATURE_LAYOUT
    }

    /// Learned classes for a categorical field, sorted
    pub fn classes(&self, field: CategoricalField) -> Option<&[String]> {
        self.state
            .as_ref()?
            .encoders
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.classes.as_slice())
    }

    pub fn scaler(&self, field: NumericField) -> Option<&NumericScaler> {
        self.state.as_ref()?.scalers.iter().find(|s| s.field == field)
    }

    /// Records seen at fit time
    pub fn samples(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.samples)
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Opaque state blob
    pub fn save_state(&self) -> RiskResult<Vec<u8>> {
        storage::encode_blob(TRANSFORMER_KIND, TRANSFORMER_FORMAT, self.fitted()?)
    }

    /// Rebuild a fitted transformer from `save_state` output
    pub fn load_state(blob: &[u8]) -> RiskResult<Self> {
        let state: FittedState = storage::decode_blob(TRANSFORMER_KIND, TRANSFORMER_FORMAT, blob)?;
        state.layout.validate()?;

        let encoders_in_order = state
            .encoders
            .iter()
            .map(|e| e.field)
            .eq(CategoricalField::ALL.iter().copied());
        let scalers_in_order = state
            .scalers
            .iter()
            .map(|s| s.field)
            .eq(NumericField::ALL.iter().copied());

        if !encoders_in_order
            || !scalers_in_order
            || state.encoders.iter().any(|e| e.classes.is_empty())
            || !state.encoders.iter().all(|e| e.classes.windows(2).all(|w| w[0] < w[1]))
        {
            return Err(RiskError::CorruptState(
                "feature transformer tables incomplete".to_string(),
            ));
        }

        Ok(Self { state: Some(state) })
    }

    pub fn save(&self, path: &Path) -> RiskResult<()> {
        storage::write_blob(path, &self.save_state()?)
    }

    pub fn load(path: &Path) -> RiskResult<Self> {
        let transformer = Self::load_state(&storage::read_blob(path)?)?;
        log::info!(
            "Loaded feature transformer from {} ({} samples at fit)",
            path.display(),
            transformer.samples()
        );
        Ok(transformer)
    }
}
