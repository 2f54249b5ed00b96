//! Record Field Catalogue
//!
//! Names and groups of every feature-bearing record field. The order of
//! `ALL` in each group is the order used by the feature layout.

use serde::{Deserialize, Serialize};

/// Categorical fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    DeviceType,
    DataType,
    LocationType,
    AccessPattern,
    DataSharing,
    ComplianceStatus,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 6] = [
        CategoricalField::DeviceType,
        CategoricalField::DataType,
        CategoricalField::LocationType,
        CategoricalField::AccessPattern,
        CategoricalField::DataSharing,
        CategoricalField::ComplianceStatus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CategoricalField::DeviceType => "device_type",
            CategoricalField::DataType => "data_type",
            CategoricalField::LocationType => "location_type",
            CategoricalField::AccessPattern => "access_pattern",
            CategoricalField::DataSharing => "data_sharing",
            CategoricalField::ComplianceStatus => "compliance_status",
        }
    }
}

/// Numeric fields with their declared domain (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    AccessFrequency,
    NetworkSecurityLevel,
    DataSensitivity,
    EncryptionLevel,
    RetentionPeriod,
    DataVolume,
    LastAuditDays,
    StorageDuration,
    SecurityIncidents,
}

impl NumericField {
    pub const ALL: [NumericField; 9] = [
        NumericField::AccessFrequency,
        NumericField::NetworkSecurityLevel,
        NumericField::DataSensitivity,
        NumericField::EncryptionLevel,
        NumericField::RetentionPeriod,
        NumericField::DataVolume,
        NumericField::LastAuditDays,
        NumericField::StorageDuration,
        NumericField::SecurityIncidents,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericField::AccessFrequency => "access_frequency",
            NumericField::NetworkSecurityLevel => "network_security_level",
            NumericField::DataSensitivity => "data_sensitivity",
            NumericField::EncryptionLevel => "encryption_level",
            NumericField::RetentionPeriod => "retention_period",
            NumericField::DataVolume => "data_volume",
            NumericField::LastAuditDays => "last_audit_days",
            NumericField::StorageDuration => "storage_duration",
            NumericField::SecurityIncidents => "security_incidents",
        }
    }

    /// Inclusive domain of the field
    pub fn domain(&self) -> (i64, i64) {
        match self {
            NumericField::NetworkSecurityLevel => (1, 5),
            NumericField::DataSensitivity => (1, 5),
            NumericField::EncryptionLevel => (1, 3),
            _ => (0, u32::MAX as i64),
        }
    }
}

/// Boolean privacy-control fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanField {
    UserConsent,
    DataAnonymization,
    DataPseudonymization,
    DataMinimization,
    PurposeLimitation,
    PrivacyImpactAssessment,
    DataProtectionOfficer,
}

impl BooleanField {
    pub const ALL: [BooleanField; 7] = [
        BooleanField::UserConsent,
        BooleanField::DataAnonymization,
        BooleanField::DataPseudonymization,
        BooleanField::DataMinimization,
        BooleanField::PurposeLimitation,
        BooleanField::PrivacyImpactAssessment,
        BooleanField::DataProtectionOfficer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BooleanField::UserConsent => "user_consent",
            BooleanField::DataAnonymization => "data_anonymization",
            BooleanField::DataPseudonymization => "data_pseudonymization",
            BooleanField::DataMinimization => "data_minimization",
            BooleanField::PurposeLimitation => "purpose_limitation",
            BooleanField::PrivacyImpactAssessment => "privacy_impact_assessment",
            BooleanField::DataProtectionOfficer => "data_protection_officer",
        }
    }
}

/// Name of the optional identifier column
pub const DEVICE_ID_FIELD: &str = "device_id";

/// Name of the label column in a training corpus
pub const LABEL_FIELD: &str = "risk_level";
