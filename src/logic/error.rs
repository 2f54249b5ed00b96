//! Error handling
//!
//! One taxonomy for the whole engine: validation, state and labelling
//! failures. Nothing here maps an error to a default risk level.

use std::path::PathBuf;

pub type RiskResult<T> = Result<T, RiskError>;

#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    // Validation errors
    #[error("unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: &'static str, value: String },

    #[error("unseen category '{value}' for field '{field}' (not present at fit time)")]
    UnseenCategory { field: &'static str, value: String },

    #[error("missing required feature: {0}")]
    MissingField(&'static str),

    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("field '{field}' out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("risk level must be between 1 and 5, got {0}")]
    InvalidRiskLevel(i64),

    #[error("empty corpus")]
    EmptyCorpus,

    #[error("length mismatch: {features} feature rows vs {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("feature width mismatch: expected {expected} columns, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    // State errors
    #[error("{0} used before it was fitted")]
    NotFitted(&'static str),

    #[error("state not found: {0}")]
    StateNotFound(PathBuf),

    #[error("corrupt state: {0}")]
    CorruptState(String),

    #[error(
        "feature layout mismatch: expected v{expected_version} ({expected_hash:08x}), got v{actual_version} ({actual_hash:08x})"
    )]
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    // Labelling errors
    #[error("labelling failed at row {row}: {source}")]
    Labeling {
        row: usize,
        #[source]
        source: Box<RiskError>,
    },

    // Repository errors
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    // Infrastructure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl RiskError {
    /// Caller supplied something the engine refuses to interpret
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RiskError::UnknownCategory { .. }
                | RiskError::UnseenCategory { .. }
                | RiskError::MissingField(_)
                | RiskError::InvalidValue { .. }
                | RiskError::OutOfRange { .. }
                | RiskError::InvalidRiskLevel(_)
                | RiskError::EmptyCorpus
                | RiskError::LengthMismatch { .. }
                | RiskError::WidthMismatch { .. }
        )
    }

    /// Fitted/persisted state is unusable; the call must abort
    pub fn is_state(&self) -> bool {
        matches!(
            self,
            RiskError::NotFitted(_)
                | RiskError::StateNotFound(_)
                | RiskError::CorruptState(_)
                | RiskError::LayoutMismatch { .. }
        )
    }

    /// Wrap an error raised while labelling corpus row `row`
    pub fn at_row(row: usize, source: RiskError) -> Self {
        RiskError::Labeling {
            row,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy() {
        assert!(RiskError::InvalidRiskLevel(6).is_validation());
        assert!(RiskError::NotFitted("transformer").is_state());
        assert!(!RiskError::NotFitted("transformer").is_validation());

        let wrapped = RiskError::at_row(3, RiskError::MissingField("data_type"));
        assert!(!wrapped.is_validation());
        assert!(wrapped.to_string().contains("row 3"));
        assert!(wrapped.to_string().contains("data_type"));
    }
}
