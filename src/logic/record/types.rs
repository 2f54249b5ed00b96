//! Record Types
//!
//! Closed vocabularies for the categorical record fields and the ordinal
//! risk level. No scoring logic here, only data.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::logic::error::{RiskError, RiskResult};

// ============================================================================
// CATEGORICAL VOCABULARIES
// ============================================================================

/// Declares a closed vocabulary: wire names, `ALL`, `as_str`, `FromStr`.
/// Parsing an unlisted value is an `UnknownCategory` error for `$field`.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Record field this vocabulary belongs to
            pub const FIELD: &'static str = $field;

            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = RiskError;

            fn from_str(value: &str) -> RiskResult<Self> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(RiskError::UnknownCategory {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Kind of IoT device
    DeviceType, "device_type" {
        Camera => "camera",
        Sensor => "sensor",
        Actuator => "actuator",
        Gateway => "gateway",
        Wearable => "wearable",
    }
}

vocabulary! {
    /// Kind of data the device collects
    DataType, "data_type" {
        Location => "location",
        Video => "video",
        Audio => "audio",
        Temperature => "temperature",
        Humidity => "humidity",
        Pressure => "pressure",
        Health => "health",
        Identification => "identification",
    }
}

vocabulary! {
    /// Where the device is installed
    LocationType, "location_type" {
        PublicSpace => "public_space",
        PrivateSpace => "private_space",
        SemiPublic => "semi_public",
        Restricted => "restricted",
    }
}

vocabulary! {
    AccessPattern, "access_pattern" {
        Regular => "regular",
        Irregular => "irregular",
        Burst => "burst",
    }
}

vocabulary! {
    /// Scope of data sharing
    DataSharing, "data_sharing" {
        None => "none",
        Internal => "internal",
        External => "external",
    }
}

vocabulary! {
    /// Tri-state compliance status; also the knowledge base verdict
    ComplianceStatus, "compliance_status" {
        Compliant => "compliant",
        PartiallyCompliant => "partially_compliant",
        NonCompliant => "non_compliant",
    }
}

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Ordinal privacy risk level, 1 (low) to 5 (critical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RiskLevel {
    Low = 1,
    Medium = 2,
    High = 3,
    VeryHigh = 4,
    Critical = 5,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
        RiskLevel::Critical,
    ];

    /// Number of risk levels
    pub const COUNT: usize = 5;

    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Zero-based position in `ALL`
    pub fn index(&self) -> usize {
        self.value() as usize - 1
    }

    /// Strict conversion; anything outside 1-5 is a domain error
    pub fn from_value(value: i64) -> RiskResult<Self> {
        match value {
            1 => Ok(RiskLevel::Low),
            2 => Ok(RiskLevel::Medium),
            3 => Ok(RiskLevel::High),
            4 => Ok(RiskLevel::VeryHigh),
            5 => Ok(RiskLevel::Critical),
            other => Err(RiskError::InvalidRiskLevel(other)),
        }
    }

    /// Saturating conversion used after normalizing a raw score
    pub fn clamped(value: i64) -> Self {
        match value {
            i64::MIN..=1 => RiskLevel::Low,
            2 => RiskLevel::Medium,
            3 => RiskLevel::High,
            4 => RiskLevel::VeryHigh,
            _ => RiskLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = RiskError;

    fn try_from(value: u8) -> RiskResult<Self> {
        RiskLevel::from_value(value as i64)
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> u8 {
        level.value()
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.value(), self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_round_trip_names() {
        for device in DeviceType::ALL {
            assert_eq!(device.as_str().parse::<DeviceType>().unwrap(), *device);
        }
        assert_eq!(LocationType::PublicSpace.as_str(), "public_space");
        assert_eq!(ComplianceStatus::PartiallyCompliant.as_str(), "partially_compliant");
    }

    #[test]
    fn test_unknown_category() {
        let err = "drone".parse::<DeviceType>().unwrap_err();
        match err {
            RiskError::UnknownCategory { field, value } => {
                assert_eq!(field, "device_type");
                assert_eq!(value, "drone");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_serde_names_match_wire_names() {
        let json = serde_json::to_string(&DataSharing::External).unwrap();
        assert_eq!(json, "\"external\"");
        let parsed: ComplianceStatus = serde_json::from_str("\"non_compliant\"").unwrap();
        assert_eq!(parsed, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_risk_level_bounds() {
        assert!(RiskLevel::from_value(0).is_err());
        assert!(RiskLevel::from_value(6).is_err());
        assert_eq!(RiskLevel::from_value(3).unwrap(), RiskLevel::High);
        assert_eq!(RiskLevel::clamped(-4), RiskLevel::Low);
        assert_eq!(RiskLevel::clamped(9), RiskLevel::Critical);
        assert_eq!(RiskLevel::Critical.index(), 4);
    }

    #[test]
    fn test_risk_level_serde_as_integer() {
        assert_eq!(serde_json::to_string(&RiskLevel::VeryHigh).unwrap(), "4");
        assert!(serde_json::from_str::<RiskLevel>("7").is_err());
    }
}
