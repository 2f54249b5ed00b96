//! Assessment request/response and history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::knowledge::RiskFactors;
use crate::logic::record::{ComplianceStatus, Device, Record, RiskLevel};

/// What a caller submits for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// Context fields; device type, location type, primary data type and
    /// security level are overwritten from the device
    pub record: Record,
    pub consent_given: bool,
    /// Replaces `record.data_sensitivity` when set
    #[serde(default)]
    pub data_sensitivity: Option<u8>,
}

impl AssessmentRequest {
    pub fn new(record: Record, consent_given: bool) -> Self {
        Self {
            record,
            consent_given,
            data_sensitivity: None,
        }
    }

    pub fn with_sensitivity(mut self, level: u8) -> Self {
        self.data_sensitivity = Some(level);
        self
    }
}

/// Outcome of one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: Uuid,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub risk_level: RiskLevel,
    /// Probability per level 1-5
    pub probabilities: [f64; RiskLevel::COUNT],
    pub mitigations: Vec<String>,
    pub compliance_status: ComplianceStatus,
    pub risk_factors: RiskFactors,
    /// Transformer output the decision was audited against
    pub features: Vec<f64>,
}

/// Stored record of a past assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub device_id: String,
    pub risk_level: RiskLevel,
    pub timestamp: DateTime<Utc>,
    pub mitigations: Vec<String>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub fn from_result(result: &AssessmentResult) -> Self {
        Self {
            id: result.id.to_string(),
            device_id: result.device_id.clone(),
            risk_level: result.risk_level,
            timestamp: result.timestamp,
            mitigations: result.mitigations.clone(),
            resolved: false,
            resolved_at: None,
        }
    }

    /// Mark resolved; the first resolution time is kept
    pub fn resolve(&mut self) {
        if !self.resolved {
            self.resolved = true;
            self.resolved_at = Some(Utc::now());
        }
    }
}

/// Entities stored in a repository
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Device {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for HistoryEntry {
    fn id(&self) -> &str {
        &self.id
    }
}
