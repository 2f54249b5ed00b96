//! Records - typed observation plus its loosely typed wire form
//!
//! `RawRecord` is what arrives from CSV rows or JSON bodies.
//! `Record::from_raw` is the validation boundary: after it, every
//! categorical value is in its vocabulary and every bounded number is in
//! its domain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fields::{BooleanField, CategoricalField, NumericField, DEVICE_ID_FIELD};
use super::types::{
    AccessPattern, ComplianceStatus, DataSharing, DataType, DeviceType, LocationType, RiskLevel,
};
use crate::logic::error::{RiskError, RiskResult};

// ============================================================================
// FEATURE SOURCE
// ============================================================================

/// Anything the transformer and classifier can read features from
pub trait FeatureSource {
    /// Categorical value as its wire name
    fn category(&self, field: CategoricalField) -> RiskResult<&str>;

    fn number(&self, field: NumericField) -> RiskResult<f64>;

    fn flag(&self, field: BooleanField) -> RiskResult<bool>;

    /// Whether the field is present at all
    fn has_field(&self, name: &str) -> bool;
}

// ============================================================================
// RAW RECORD
// ============================================================================

/// Untyped record: field name → textual value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn require(&self, field: &'static str) -> RiskResult<&str> {
        self.get(field).ok_or(RiskError::MissingField(field))
    }

    fn integer(&self, field: NumericField) -> RiskResult<i64> {
        let name = field.name();
        let raw = self.require(name)?.trim();
        let value: i64 = raw.parse().map_err(|_| RiskError::InvalidValue {
            field: name,
            value: raw.to_string(),
        })?;
        let (min, max) = field.domain();
        if value < min || value > max {
            return Err(RiskError::OutOfRange {
                field: name,
                value,
                min,
                max,
            });
        }
        Ok(value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Accepts true/false, 1/0, yes/no (any case)
pub fn parse_flag(field: &'static str, raw: &str) -> RiskResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(RiskError::InvalidValue {
            field,
            value: raw.to_string(),
        }),
    }
}

impl FeatureSource for RawRecord {
    fn category(&self, field: CategoricalField) -> RiskResult<&str> {
        self.require(field.name())
    }

    /// Same integer parsing and domain check as `Record::from_raw`
    fn number(&self, field: NumericField) -> RiskResult<f64> {
        Ok(self.integer(field)? as f64)
    }

    fn flag(&self, field: BooleanField) -> RiskResult<bool> {
        let name = field.name();
        parse_flag(name, self.require(name)?)
    }

    fn has_field(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

// ============================================================================
// TYPED RECORD
// ============================================================================

/// One device/context observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    // Categorical
    pub device_type: DeviceType,
    pub data_type: DataType,
    pub location_type: LocationType,
    pub access_pattern: AccessPattern,
    pub data_sharing: DataSharing,
    pub compliance_status: ComplianceStatus,

    // Numeric
    pub access_frequency: u32,
    pub network_security_level: u8,
    pub data_sensitivity: u8,
    pub encryption_level: u8,
    pub retention_period: u32,
    pub data_volume: u32,
    pub last_audit_days: u32,
    pub storage_duration: u32,
    pub security_incidents: u32,

    // Privacy controls
    pub user_consent: bool,
    pub data_anonymization: bool,
    pub data_pseudonymization: bool,
    pub data_minimization: bool,
    pub purpose_limitation: bool,
    pub privacy_impact_assessment: bool,
    pub data_protection_officer: bool,
}

impl Record {
    /// Parse and validate a raw record
    pub fn from_raw(raw: &RawRecord) -> RiskResult<Self> {
        let record = Self {
            device_id: raw.get(DEVICE_ID_FIELD).map(str::to_string),
            device_type: raw.require(DeviceType::FIELD)?.parse()?,
            data_type: raw.require(DataType::FIELD)?.parse()?,
            location_type: raw.require(LocationType::FIELD)?.parse()?,
            access_pattern: raw.require(AccessPattern::FIELD)?.parse()?,
            data_sharing: raw.require(DataSharing::FIELD)?.parse()?,
            compliance_status: raw.require(ComplianceStatus::FIELD)?.parse()?,
            access_frequency: raw.integer(NumericField::AccessFrequency)? as u32,
            network_security_level: raw.integer(NumericField::NetworkSecurityLevel)? as u8,
            data_sensitivity: raw.integer(NumericField::DataSensitivity)? as u8,
            encryption_level: raw.integer(NumericField::EncryptionLevel)? as u8,
            retention_period: raw.integer(NumericField::RetentionPeriod)? as u32,
            data_volume: raw.integer(NumericField::DataVolume)? as u32,
            last_audit_days: raw.integer(NumericField::LastAuditDays)? as u32,
            storage_duration: raw.integer(NumericField::StorageDuration)? as u32,
            security_incidents: raw.integer(NumericField::SecurityIncidents)? as u32,
            user_consent: raw.flag(BooleanField::UserConsent)?,
            data_anonymization: raw.flag(BooleanField::DataAnonymization)?,
            data_pseudonymization: raw.flag(BooleanField::DataPseudonymization)?,
            data_minimization: raw.flag(BooleanField::DataMinimization)?,
            purpose_limitation: raw.flag(BooleanField::PurposeLimitation)?,
            privacy_impact_assessment: raw.flag(BooleanField::PrivacyImpactAssessment)?,
            data_protection_officer: raw.flag(BooleanField::DataProtectionOfficer)?,
        };
        Ok(record)
    }

    /// Wire form, one entry per field
    pub fn to_raw(&self) -> RawRecord {
        let mut raw = RawRecord::new();
        if let Some(id) = &self.device_id {
            raw.insert(DEVICE_ID_FIELD, id.clone());
        }
        for field in CategoricalField::ALL {
            raw.insert(field.name(), self.categorical(field));
        }
        for field in NumericField::ALL {
            raw.insert(field.name(), self.integer(field).to_string());
        }
        for field in BooleanField::ALL {
            raw.insert(field.name(), self.control(field).to_string());
        }
        raw
    }

    /// Check bounded numeric domains (typed records can be built directly)
    pub fn validate(&self) -> RiskResult<()> {
        for field in NumericField::ALL {
            let (min, max) = field.domain();
            let value = self.integer(field);
            if value < min || value > max {
                return Err(RiskError::OutOfRange {
                    field: field.name(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    pub fn categorical(&self, field: CategoricalField) -> &'static str {
        match field {
            CategoricalField::DeviceType => self.device_type.as_str(),
            CategoricalField::DataType => self.data_type.as_str(),
            CategoricalField::LocationType => self.location_type.as_str(),
            CategoricalField::AccessPattern => self.access_pattern.as_str(),
            CategoricalField::DataSharing => self.data_sharing.as_str(),
            CategoricalField::ComplianceStatus => self.compliance_status.as_str(),
        }
    }

    pub fn integer(&self, field: NumericField) -> i64 {
        match field {
            NumericField::AccessFrequency => self.access_frequency as i64,
            NumericField::NetworkSecurityLevel => self.network_security_level as i64,
            NumericField::DataSensitivity => self.data_sensitivity as i64,
            NumericField::EncryptionLevel => self.encryption_level as i64,
            NumericField::RetentionPeriod => self.retention_period as i64,
            NumericField::DataVolume => self.data_volume as i64,
            NumericField::LastAuditDays => self.last_audit_days as i64,
            NumericField::StorageDuration => self.storage_duration as i64,
            NumericField::SecurityIncidents => self.security_incidents as i64,
        }
    }

    pub fn control(&self, field: BooleanField) -> bool {
        match field {
            BooleanField::UserConsent => self.user_consent,
            BooleanField::DataAnonymization => self.data_anonymization,
            BooleanField::DataPseudonymization => self.data_pseudonymization,
            BooleanField::DataMinimization => self.data_minimization,
            BooleanField::PurposeLimitation => self.purpose_limitation,
            BooleanField::PrivacyImpactAssessment => self.privacy_impact_assessment,
            BooleanField::DataProtectionOfficer => self.data_protection_officer,
        }
    }
}

impl FeatureSource for Record {
    fn category(&self, field: CategoricalField) -> RiskResult<&str> {
        Ok(self.categorical(field))
    }

    fn number(&self, field: NumericField) -> RiskResult<f64> {
        Ok(self.integer(field) as f64)
    }

    fn flag(&self, field: BooleanField) -> RiskResult<bool> {
        Ok(self.control(field))
    }

    fn has_field(&self, name: &str) -> bool {
        name != DEVICE_ID_FIELD || self.device_id.is_some()
    }
}

// ============================================================================
// LABELED RECORD
// ============================================================================

/// Corpus row: record plus its risk label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub record: Record,
    pub risk_level: RiskLevel,
}

impl LabeledRecord {
    pub fn new(record: Record, risk_level: RiskLevel) -> Self {
        Self { record, risk_level }
    }
}
