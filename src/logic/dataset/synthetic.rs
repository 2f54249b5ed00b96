//! Synthetic Corpus Generation
//!
//! Seeded generator for labelled training corpora. Distributions follow the
//! field domains; labels come from the scoring heuristic.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::logic::error::{RiskError, RiskResult};
use crate::logic::record::{
    AccessPattern, CategoricalField, ComplianceStatus, DataSharing, DataType, DeviceType,
    LabeledRecord, LocationType, NumericField, Record, RiskLevel,
};
use crate::logic::scoring::risk_score;

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

const P_CONSENT: f64 = 0.7;
const P_ANONYMIZATION: f64 = 0.6;
const P_PSEUDONYMIZATION: f64 = 0.5;
const P_MINIMIZATION: f64 = 0.7;
const P_PURPOSE_LIMITATION: f64 = 0.8;
const P_IMPACT_ASSESSMENT: f64 = 0.7;
const P_PROTECTION_OFFICER: f64 = 0.8;

const SHARING_WEIGHTS: [(DataSharing, f64); 3] = [
    (DataSharing::None, 0.4),
    (DataSharing::Internal, 0.4),
    (DataSharing::External, 0.2),
];

const COMPLIANCE_WEIGHTS: [(ComplianceStatus, f64); 3] = [
    (ComplianceStatus::Compliant, 0.6),
    (ComplianceStatus::PartiallyCompliant, 0.3),
    (ComplianceStatus::NonCompliant, 0.1),
];

fn uniform<T: Copy>(rng: &mut ChaCha8Rng, values: &[T]) -> T {
    // vocabularies are never empty
    values[rng.gen_range(0..values.len())]
}

fn weighted<T: Copy>(rng: &mut ChaCha8Rng, table: &[(T, f64)]) -> T {
    let mut draw: f64 = rng.gen();
    for (value, weight) in table {
        if draw < *weight {
            return *value;
        }
        draw -= weight;
    }
    table[table.len() - 1].0
}

/// One random record (unlabelled)
pub fn random_record(rng: &mut ChaCha8Rng, device_id: String) -> Record {
    Record {
        device_id: Some(device_id),
        device_type: uniform(rng, DeviceType::ALL),
        data_type: uniform(rng, DataType::ALL),
        location_type: uniform(rng, LocationType::ALL),
        access_pattern: uniform(rng, AccessPattern::ALL),
        data_sharing: weighted(rng, &SHARING_WEIGHTS),
        compliance_status: weighted(rng, &COMPLIANCE_WEIGHTS),
        access_frequency: rng.gen_range(1..100),
        network_security_level: rng.gen_range(1..=5),
        data_sensitivity: rng.gen_range(1..=5),
        encryption_level: rng.gen_range(1..=3),
        retention_period: rng.gen_range(1..365),
        data_volume: rng.gen_range(1..1000),
        last_audit_days: rng.gen_range(1..90),
        storage_duration: rng.gen_range(1..365),
        security_incidents: rng.gen_range(0..5),
        user_consent: rng.gen_bool(P_CONSENT),
        data_anonymization: rng.gen_bool(P_ANONYMIZATION),
        data_pseudonymization: rng.gen_bool(P_PSEUDONYMIZATION),
        data_minimization: rng.gen_bool(P_MINIMIZATION),
        purpose_limitation: rng.gen_bool(P_PURPOSE_LIMITATION),
        privacy_impact_assessment: rng.gen_bool(P_IMPACT_ASSESSMENT),
        data_protection_officer: rng.gen_bool(P_PROTECTION_OFFICER),
    }
}

/// `n` labelled records, identical for identical seeds
pub fn generate_corpus(n: usize, seed: u64) -> Vec<LabeledRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let corpus: Vec<LabeledRecord> = (0..n)
        .map(|i| {
            let record = random_record(&mut rng, format!("device_{}", i));
            let level = risk_score(&record);
            LabeledRecord::new(record, level)
        })
        .collect();

    log::info!("Generated {} synthetic records (seed {})", corpus.len(), seed);
    corpus
}

// ============================================================================
// SPLIT
// ============================================================================

/// Shuffled train/validation split. Both parts are non-empty when
/// there are at least two rows.
pub fn split_corpus<T: Clone>(rows: &[T], train_ratio: f64, seed: u64) -> RiskResult<(Vec<T>, Vec<T>)> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(RiskError::InvalidValue {
            field: "train_ratio",
            value: train_ratio.to_string(),
        });
    }
    if rows.is_empty() {
        return Err(RiskError::EmptyCorpus);
    }

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let n = rows.len();
    let n_train = ((n as f64 * train_ratio).round() as usize).clamp(1, n.saturating_sub(1).max(1));

    let train = order[..n_train].iter().map(|&i| rows[i].clone()).collect();
    let validation = order[n_train..].iter().map(|&i| rows[i].clone()).collect();
    Ok((train, validation))
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
}

/// Corpus statistics for reports and the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub total: usize,
    pub level_counts: BTreeMap<RiskLevel, usize>,
    pub category_counts: BTreeMap<&'static str, BTreeMap<&'static str, usize>>,
    pub numeric: BTreeMap<&'static str, NumericSummary>,
}

impl CorpusSummary {
    pub fn from_corpus(corpus: &[LabeledRecord]) -> Self {
        let mut level_counts: BTreeMap<RiskLevel, usize> =
            RiskLevel::ALL.iter().map(|l| (*l, 0)).collect();
        let mut category_counts: BTreeMap<&'static str, BTreeMap<&'static str, usize>> = BTreeMap::new();

        for row in corpus {
            *level_counts.entry(row.risk_level).or_default() += 1;
            for field in CategoricalField::ALL {
                *category_counts
                    .entry(field.name())
                    .or_default()
                    .entry(row.record.categorical(field))
                    .or_default() += 1;
            }
        }

        let mut numeric = BTreeMap::new();
        if !corpus.is_empty() {
            for field in NumericField::ALL {
                let values: Vec<i64> = corpus.iter().map(|r| r.record.integer(field)).collect();
                numeric.insert(
                    field.name(),
                    NumericSummary {
                        min: values.iter().copied().min().unwrap_or_default(),
                        max: values.iter().copied().max().unwrap_or_default(),
                        mean: values.iter().sum::<i64>() as f64 / values.len() as f64,
                    },
                );
            }
        }

        Self {
            total: corpus.len(),
            level_counts,
            category_counts,
            numeric,
        }
    }

    /// Share of rows per level
    pub fn level_share(&self, level: RiskLevel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.level_counts.get(&level).copied().unwrap_or_default() as f64 / self.total as f64
    }
}
