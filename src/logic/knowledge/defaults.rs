//! Built-in knowledge base used when no document is configured

use crate::logic::record::{ComplianceStatus, DataType, DeviceType, LocationType, RiskLevel};
use crate::logic::scoring::rules::{data_risk, device_risk, location_risk};

use super::types::{ComplianceRule, FactorWeights, KnowledgeBase, MitigationStrategy, PrivacyRisk};

/// Data types that need consent to be lawful
pub const SENSITIVE_DATA_TYPES: [DataType; 5] = [
    DataType::Location,
    DataType::Video,
    DataType::Audio,
    DataType::Health,
    DataType::Identification,
];

/// Security levels at or below this are only partially compliant
pub const WEAK_NETWORK_SECURITY: u8 = 2;

const MITIGATIONS: [(RiskLevel, &str); 15] = [
    (RiskLevel::Low, "Maintain current privacy controls"),
    (RiskLevel::Low, "Review data handling practices annually"),
    (RiskLevel::Low, "Keep a record of processing activities"),
    (RiskLevel::Medium, "Review user consent records"),
    (RiskLevel::Medium, "Apply data minimization to collected streams"),
    (RiskLevel::Medium, "Schedule a privacy audit within 90 days"),
    (RiskLevel::High, "Encrypt data at rest and in transit"),
    (RiskLevel::High, "Restrict access to authorized personnel"),
    (RiskLevel::High, "Conduct a privacy impact assessment"),
    (RiskLevel::VeryHigh, "Anonymize or pseudonymize personal data"),
    (RiskLevel::VeryHigh, "Stop sharing data with external parties"),
    (RiskLevel::VeryHigh, "Raise network security and audit monthly"),
    (RiskLevel::Critical, "Suspend non-essential data collection immediately"),
    (RiskLevel::Critical, "Obtain explicit user consent before further processing"),
    (RiskLevel::Critical, "Escalate to the data protection officer"),
];

pub fn default_knowledge_base() -> KnowledgeBase {
    KnowledgeBase {
        mitigations: MITIGATIONS
            .iter()
            .map(|(level, text)| MitigationStrategy {
                risk_level: *level,
                description: text.to_string(),
            })
            .collect(),
        risks: vec![
            PrivacyRisk::new("data_breach", RiskLevel::Critical, "Personal data exposed to unauthorized parties")
                .with_mitigation("Escalate to the data protection officer"),
            PrivacyRisk::new("unauthorized_access", RiskLevel::VeryHigh, "Device data reachable without authorization")
                .with_mitigation("Restrict access to authorized personnel"),
        ],
        policies: Vec::new(),
        personal_data_types: SENSITIVE_DATA_TYPES.iter().map(|d| d.as_str().to_string()).collect(),
        compliance_rules: default_compliance_rules(),
        weights: default_weights(),
    }
}

pub fn default_compliance_rules() -> Vec<ComplianceRule> {
    vec![
        ComplianceRule {
            name: "sensitive data without consent".to_string(),
            consent: Some(false),
            max_network_security: None,
            data_types: SENSITIVE_DATA_TYPES.to_vec(),
            status: ComplianceStatus::NonCompliant,
        },
        ComplianceRule {
            name: "no consent".to_string(),
            consent: Some(false),
            max_network_security: None,
            data_types: Vec::new(),
            status: ComplianceStatus::PartiallyCompliant,
        },
        ComplianceRule {
            name: "weak network security".to_string(),
            consent: None,
            max_network_security: Some(WEAK_NETWORK_SECURITY),
            data_types: Vec::new(),
            status: ComplianceStatus::PartiallyCompliant,
        },
    ]
}

/// Same weights as the labelling heuristic
pub fn default_weights() -> FactorWeights {
    FactorWeights {
        device: DeviceType::ALL.iter().map(|d| (*d, device_risk(*d) as u8)).collect(),
        data: DataType::ALL.iter().map(|d| (*d, data_risk(*d) as u8)).collect(),
        location: LocationType::ALL.iter().map(|l| (*l, location_risk(*l) as u8)).collect(),
    }
}
