//! Risk Scoring Heuristic
//!
//! Deterministic, explainable labelling function. Input: Record.
//! Output: RiskLevel. Used to label training corpora, never at serving time.

use serde::Serialize;

use super::rules::*;
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::record::{LabeledRecord, RawRecord, Record, RiskLevel};

// ============================================================================
// SCORE BREAKDOWN
// ============================================================================

/// One named contribution to the raw score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub factor: &'static str,
    pub points: i64,
}

/// How the label was reached
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub contributions: Vec<Contribution>,
    pub raw_score: i64,
    pub risk_level: RiskLevel,
}

impl ScoreBreakdown {
    /// Contributions that added at least one point, largest first
    pub fn drivers(&self) -> Vec<&Contribution> {
        let mut drivers: Vec<&Contribution> =
            self.contributions.iter().filter(|c| c.points > 0).collect();
        drivers.sort_by(|a, b| b.points.cmp(&a.points));
        drivers
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// Full breakdown of the heuristic score
pub fn score_breakdown(record: &Record) -> ScoreBreakdown {
    let penalty = |missing: bool, points: i64| if missing { points } else { 0 };

    let contributions = vec![
        Contribution { factor: "device_type", points: device_risk(record.device_type) },
        Contribution { factor: "data_type", points: data_risk(record.data_type) },
        Contribution { factor: "location_type", points: location_risk(record.location_type) },
        Contribution {
            factor: "network_security_level",
            points: MAX_NETWORK_SECURITY + 1 - record.network_security_level as i64,
        },
        Contribution { factor: "data_sensitivity", points: record.data_sensitivity as i64 },
        Contribution {
            factor: "encryption_level",
            points: MAX_ENCRYPTION + 1 - record.encryption_level as i64,
        },
        Contribution { factor: "user_consent", points: penalty(!record.user_consent, NO_CONSENT_PENALTY) },
        Contribution { factor: "access_pattern", points: access_pattern_risk(record.access_pattern) },
        Contribution {
            factor: "last_audit_days",
            points: penalty(record.last_audit_days > STALE_AUDIT_DAYS, STALE_AUDIT_PENALTY),
        },
        Contribution {
            factor: "data_anonymization",
            points: penalty(!record.data_anonymization, NO_ANONYMIZATION_PENALTY),
        },
        Contribution {
            factor: "data_pseudonymization",
            points: penalty(!record.data_pseudonymization, NO_PSEUDONYMIZATION_PENALTY),
        },
        Contribution {
            factor: "data_minimization",
            points: penalty(!record.data_minimization, NO_MINIMIZATION_PENALTY),
        },
        Contribution {
            factor: "purpose_limitation",
            points: penalty(!record.purpose_limitation, NO_PURPOSE_LIMITATION_PENALTY),
        },
        Contribution { factor: "data_sharing", points: sharing_risk(record.data_sharing) },
        Contribution { factor: "compliance_status", points: compliance_risk(record.compliance_status) },
        Contribution { factor: "security_incidents", points: record.security_incidents as i64 },
        Contribution {
            factor: "privacy_impact_assessment",
            points: penalty(!record.privacy_impact_assessment, NO_IMPACT_ASSESSMENT_PENALTY),
        },
        Contribution {
            factor: "data_protection_officer",
            points: penalty(!record.data_protection_officer, NO_PROTECTION_OFFICER_PENALTY),
        },
    ];

    let raw_score: i64 = contributions.iter().map(|c| c.points).sum();

    ScoreBreakdown {
        contributions,
        raw_score,
        risk_level: normalize(raw_score),
    }
}

/// Integer-divide by the normalization constant, clamp to 1-5
pub fn normalize(raw_score: i64) -> RiskLevel {
    RiskLevel::clamped(raw_score.div_euclid(NORMALIZATION))
}

/// Risk label for a validated record
pub fn risk_score(record: &Record) -> RiskLevel {
    score_breakdown(record).risk_level
}

/// Validate then score a raw record; unknown categories fail fast
pub fn score_raw(raw: &RawRecord) -> RiskResult<RiskLevel> {
    let record = Record::from_raw(raw)?;
    Ok(risk_score(&record))
}

/// Label a raw corpus. Stops at the first bad row.
pub fn label_corpus(rows: &[RawRecord]) -> RiskResult<Vec<LabeledRecord>> {
    let labeled = rows
        .iter()
        .enumerate()
        .map(|(row, raw)| {
            let record = Record::from_raw(raw).map_err(|e| RiskError::at_row(row, e))?;
            let level = risk_score(&record);
            Ok(LabeledRecord::new(record, level))
        })
        .collect::<RiskResult<Vec<_>>>()?;

    log::info!("Labelled {} corpus rows", labeled.len());
    Ok(labeled)
}

/// Label already-typed records
pub fn label_records(records: Vec<Record>) -> Vec<LabeledRecord> {
    records
        .into_iter()
        .map(|record| {
            let level = risk_score(&record);
            LabeledRecord::new(record, level)
        })
        .collect()
}
