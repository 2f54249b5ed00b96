//! Risk Scoring Rules & Tables
//!
//! Sensitivity tables and penalties used by the labelling heuristic.
//! No scoring logic here, only constants and lookups.

use crate::logic::record::{
    AccessPattern, ComplianceStatus, DataSharing, DataType, DeviceType, LocationType,
};

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Raw score is integer-divided by this before clamping to 1-5
pub const NORMALIZATION: i64 = 8;

/// Highest network security level; contribution is `MAX + 1 - level`
pub const MAX_NETWORK_SECURITY: i64 = 5;

/// Highest encryption level; contribution is `MAX + 1 - level`
pub const MAX_ENCRYPTION: i64 = 3;

/// Audits older than this many days add `STALE_AUDIT_PENALTY`
pub const STALE_AUDIT_DAYS: u32 = 30;

// ============================================================================
// PENALTIES (missing privacy controls)
// ============================================================================

pub const NO_CONSENT_PENALTY: i64 = 2;
pub const STALE_AUDIT_PENALTY: i64 = 1;
pub const NO_ANONYMIZATION_PENALTY: i64 = 2;
pub const NO_PSEUDONYMIZATION_PENALTY: i64 = 1;
pub const NO_MINIMIZATION_PENALTY: i64 = 2;
pub const NO_PURPOSE_LIMITATION_PENALTY: i64 = 2;
pub const NO_IMPACT_ASSESSMENT_PENALTY: i64 = 2;
pub const NO_PROTECTION_OFFICER_PENALTY: i64 = 1;

// ============================================================================
// SENSITIVITY TABLES
// ============================================================================

pub fn device_risk(device: DeviceType) -> i64 {
    match device {
        DeviceType::Camera => 4,
        DeviceType::Sensor => 2,
        DeviceType::Actuator => 3,
        DeviceType::Gateway => 4,
        DeviceType::Wearable => 5,
    }
}

pub fn data_risk(data: DataType) -> i64 {
    match data {
        DataType::Location => 5,
        DataType::Video => 5,
        DataType::Audio => 4,
        DataType::Temperature => 1,
        DataType::Humidity => 1,
        DataType::Pressure => 1,
        DataType::Health => 5,
        DataType::Identification => 5,
    }
}

pub fn location_risk(location: LocationType) -> i64 {
    match location {
        LocationType::PublicSpace => 3,
        LocationType::PrivateSpace => 4,
        LocationType::SemiPublic => 3,
        LocationType::Restricted => 5,
    }
}

/// regular < irregular < burst
pub fn access_pattern_risk(pattern: AccessPattern) -> i64 {
    match pattern {
        AccessPattern::Regular => 0,
        AccessPattern::Irregular => 1,
        AccessPattern::Burst => 2,
    }
}

/// none < internal < external
pub fn sharing_risk(sharing: DataSharing) -> i64 {
    match sharing {
        DataSharing::None => 0,
        DataSharing::Internal => 1,
        DataSharing::External => 3,
    }
}

/// compliant < partially < non-compliant
pub fn compliance_risk(status: ComplianceStatus) -> i64 {
    match status {
        ComplianceStatus::Compliant => 0,
        ComplianceStatus::PartiallyCompliant => 1,
        ComplianceStatus::NonCompliant => 3,
    }
}
