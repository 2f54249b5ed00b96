//! Knowledge Base Types
//!
//! The `KnowledgeBase` document is plain data: mitigation strategies,
//! registered risks, policies, compliance rules and factor weights. Rule
//! evaluation lives here too so that every store answers the same way
//! for the same document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::error::{RiskError, RiskResult};
use crate::logic::record::{ComplianceStatus, DataType, Device, DeviceType, LocationType, RiskLevel};

// ============================================================================
// ENTRIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationStrategy {
    pub risk_level: RiskLevel,
    pub description: String,
}

/// Lifecycle of a registered risk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    #[default]
    Active,
    Mitigated,
    Resolved,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Active => "active",
            RiskStatus::Mitigated => "mitigated",
            RiskStatus::Resolved => "resolved",
        }
    }
}

/// Privacy risk registered by an administrator or detected on a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyRisk {
    pub id: String,
    pub level: RiskLevel,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub affected_data_types: Vec<DataType>,
    /// Device ids
    #[serde(default)]
    pub affected_devices: Vec<String>,
    #[serde(default)]
    pub mitigation_strategy: Option<String>,
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: RiskStatus,
}

impl PrivacyRisk {
    /// Active risk detected now
    pub fn new(id: impl Into<String>, level: RiskLevel, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            description: description.into(),
            affected_data_types: Vec::new(),
            affected_devices: Vec::new(),
            mitigation_strategy: None,
            detected_at: Utc::now(),
            resolved_at: None,
            status: RiskStatus::Active,
        }
    }

    pub fn with_data_types(mut self, data_types: Vec<DataType>) -> Self {
        self.affected_data_types = data_types;
        self
    }

    pub fn with_devices(mut self, devices: Vec<String>) -> Self {
        self.affected_devices = devices;
        self
    }

    pub fn with_mitigation(mut self, strategy: impl Into<String>) -> Self {
        self.mitigation_strategy = Some(strategy.into());
        self
    }

    /// Mark resolved. The first resolution time is kept.
    pub fn resolve(&mut self) {
        self.status = RiskStatus::Resolved;
        if self.resolved_at.is_none() {
            self.resolved_at = Some(Utc::now());
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == RiskStatus::Resolved
    }
}

/// Access control rule, free-form as the policy author wrote it
pub type AccessRule = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyPolicy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub data_types: Vec<DataType>,
    /// Days
    pub retention_period: u32,
    #[serde(default)]
    pub access_control_rules: Vec<AccessRule>,
    #[serde(default)]
    pub compliance_requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PrivacyPolicy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        data_types: Vec<DataType>,
        retention_period: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            data_types,
            retention_period,
            access_control_rules: Vec::new(),
            compliance_requirements: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_retention_period(&mut self, days: u32) {
        self.retention_period = days;
        self.updated_at = Utc::now();
    }

    pub fn add_access_rule(&mut self, rule: AccessRule) {
        self.access_control_rules.push(rule);
        self.updated_at = Utc::now();
    }

    /// Take over every editable field of `update`; id and `created_at` stay
    pub fn apply_update(&mut self, update: PrivacyPolicy) {
        self.name = update.name;
        self.description = update.description;
        self.data_types = update.data_types;
        self.retention_period = update.retention_period;
        self.access_control_rules = update.access_control_rules;
        self.compliance_requirements = update.compliance_requirements;
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// COMPLIANCE RULES
// ============================================================================

/// One row of the first-match compliance table. Every `Some`/non-empty
/// condition must hold for the rule to match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub name: String,
    /// Consent must equal this
    #[serde(default)]
    pub consent: Option<bool>,
    /// Network security level must be at most this
    #[serde(default)]
    pub max_network_security: Option<u8>,
    /// Device must handle at least one of these
    #[serde(default)]
    pub data_types: Vec<DataType>,
    pub status: ComplianceStatus,
}

impl ComplianceRule {
    pub fn matches(&self, device: &Device, consent_given: bool) -> bool {
        self.consent.map_or(true, |c| c == consent_given)
            && self
                .max_network_security
                .map_or(true, |max| device.network_security_level <= max)
            && (self.data_types.is_empty() || self.data_types.iter().any(|dt| device.handles(*dt)))
    }
}

// ============================================================================
// RISK FACTORS
// ============================================================================

/// Sensitivity weights (1-5) used for factor analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub device: BTreeMap<DeviceType, u8>,
    pub data: BTreeMap<DataType, u8>,
    pub location: BTreeMap<LocationType, u8>,
}

impl FactorWeights {
    fn device(&self, device: DeviceType) -> RiskResult<f64> {
        lookup(&self.device, device, DeviceType::FIELD, device.as_str())
    }

    fn data(&self, data: DataType) -> RiskResult<f64> {
        lookup(&self.data, data, DataType::FIELD, data.as_str())
    }

    fn location(&self, location: LocationType) -> RiskResult<f64> {
        lookup(&self.location, location, LocationType::FIELD, location.as_str())
    }
}

fn lookup<K: Ord>(
    table: &BTreeMap<K, u8>,
    key: K,
    field: &'static str,
    name: &str,
) -> RiskResult<f64> {
    table
        .get(&key)
        .map(|w| *w as f64)
        .ok_or_else(|| RiskError::UnknownCategory {
            field,
            value: name.to_string(),
        })
}

/// Named risk factors, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub data_sensitivity: f64,
    pub consent: f64,
    pub location_risk: f64,
    pub device_risk: f64,
    pub network_security: f64,
}

impl RiskFactors {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("data_sensitivity", self.data_sensitivity),
            ("consent", self.consent),
            ("location_risk", self.location_risk),
            ("device_risk", self.device_risk),
            ("network_security", self.network_security),
        ]
        .into_iter()
    }

    /// Name of the largest factor
    pub fn dominant(&self) -> &'static str {
        self.iter()
            .fold(("data_sensitivity", f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
            .0
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// Whole knowledge base, as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub mitigations: Vec<MitigationStrategy>,
    #[serde(default)]
    pub risks: Vec<PrivacyRisk>,
    #[serde(default)]
    pub policies: Vec<PrivacyPolicy>,
    #[serde(default)]
    pub personal_data_types: Vec<String>,
    pub compliance_rules: Vec<ComplianceRule>,
    pub weights: FactorWeights,
}

impl KnowledgeBase {
    /// Strategies for `level`, in registration order
    pub fn mitigations_for(&self, level: RiskLevel) -> Vec<String> {
        self.mitigations
            .iter()
            .filter(|m| m.risk_level == level)
            .map(|m| m.description.clone())
            .collect()
    }

    /// First matching rule wins; no match means compliant
    pub fn compliance_for(&self, device: &Device, consent_given: bool) -> ComplianceStatus {
        self.compliance_rules
            .iter()
            .find(|rule| rule.matches(device, consent_given))
            .map_or(ComplianceStatus::Compliant, |rule| rule.status)
    }

    pub fn factors_for(&self, device: &Device, consent_given: bool) -> RiskResult<RiskFactors> {
        let mut sensitivity: f64 = 0.0;
        for data_type in &device.data_types {
            sensitivity = sensitivity.max(self.weights.data(*data_type)?);
        }

        let security = device.network_security_level as f64;
        Ok(RiskFactors {
            data_sensitivity: unit(sensitivity / 5.0),
            consent: if consent_given { 0.0 } else { 1.0 },
            location_risk: unit(self.weights.location(device.location_type)? / 5.0),
            device_risk: unit(self.weights.device(device.device_type)? / 5.0),
            network_security: unit((5.0 - security) / 4.0),
        })
    }
}

fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
