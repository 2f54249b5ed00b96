//! Feature Layout - Transformer Output Schema
//!
//! ## Rules:
//! 1. Add a column → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove a column → increment FEATURE_VERSION
//!
//! Persisted transformer state carries the version and hash it was fitted
//! with and is rejected when either differs from this file.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::error::{RiskError, RiskResult};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Column names in output order
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Categorical codes (0-5) ===
    "device_type",
    "data_type",
    "location_type",
    "access_pattern",
    "data_sharing",
    "compliance_status",

    // === Standardized numerics (6-14) ===
    "access_frequency",
    "network_security_level",
    "data_sensitivity",
    "encryption_level",
    "retention_period",
    "data_volume",
    "last_audit_days",
    "storage_duration",
    "security_incidents",

    // === Privacy controls as 0/1 (15-21) ===
    "user_consent",
    "data_anonymization",
    "data_pseudonymization",
    "data_minimization",
    "purpose_limitation",
    "privacy_impact_assessment",
    "data_protection_officer",
];

/// Total number of columns. Must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 22;

/// First numeric column
pub const NUMERIC_OFFSET: usize = 6;

/// First boolean column
pub const BOOLEAN_OFFSET: usize = 15;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version and column names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout stamp stored alongside fitted state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn validate(&self) -> RiskResult<()> {
        validate_layout(self.version, self.hash)
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Reject state stamped with another layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> RiskResult<()> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(RiskError::LayoutMismatch {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// Column index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::record::{BooleanField, CategoricalField, NumericField};

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_follows_field_catalogue() {
        let expected: Vec<&str> = CategoricalField::ALL
            .iter()
            .map(|f| f.name())
            .chain(NumericField::ALL.iter().map(|f| f.name()))
            .chain(BooleanField::ALL.iter().map(|f| f.name()))
            .collect();
        assert_eq!(FEATURE_LAYOUT, expected.as_slice());
        assert_eq!(feature_index("access_frequency"), Some(NUMERIC_OFFSET));
        assert_eq!(feature_index("user_consent"), Some(BOOLEAN_OFFSET));
    }

    #[test]
    fn test_layout_hash_stable_and_non_zero() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(matches!(
            validate_layout(FEATURE_VERSION + 1, layout_hash()),
            Err(RiskError::LayoutMismatch { .. })
        ));
        assert!(validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_feature_name_lookup() {
        assert_eq!(feature_name(0), Some("device_type"));
        assert_eq!(feature_name(21), Some("data_protection_officer"));
        assert_eq!(feature_name(22), None);
        assert_eq!(feature_index("cpu_percent"), None);
    }
}
