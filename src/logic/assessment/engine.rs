//! Assessment Engine
//!
//! Per-request pipeline: assemble record → validate → transform →
//! (classify ‖ knowledge lookup) → mitigations → result.
//! The published bundle is swapped whole; a request holds its own `Arc`
//! for its whole run.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::bundle::ModelBundle;
use super::types::{AssessmentRequest, AssessmentResult};
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::knowledge::{InMemoryKnowledgeStore, KnowledgeBaseHandler, KnowledgeStore};
use crate::logic::record::{Device, Record};

pub struct AssessmentEngine<K: KnowledgeStore = InMemoryKnowledgeStore> {
    bundle: RwLock<Option<Arc<ModelBundle>>>,
    knowledge: KnowledgeBaseHandler<K>,
}

impl<K: KnowledgeStore> AssessmentEngine<K> {
    pub fn new(knowledge: KnowledgeBaseHandler<K>) -> Self {
        Self {
            bundle: RwLock::new(None),
            knowledge,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBaseHandler<K> {
        &self.knowledge
    }

    /// Replace the served bundle; returns the previous one
    pub fn publish(&self, bundle: ModelBundle) -> Option<Arc<ModelBundle>> {
        let previous = self.bundle.write().replace(Arc::new(bundle));
        log::info!("Published model bundle (replaced: {})", previous.is_some());
        previous
    }

    pub fn is_ready(&self) -> bool {
        self.bundle.read().is_some()
    }

    /// Currently published bundle
    pub fn current(&self) -> RiskResult<Arc<ModelBundle>> {
        self.bundle
            .read()
            .clone()
            .ok_or(RiskError::NotFitted("assessment engine (no model published)"))
    }

    pub fn assess(&self, device: &Device, request: &AssessmentRequest) -> RiskResult<AssessmentResult> {
        device.validate()?;
        let record = assemble_record(device, request)?;
        record.validate()?;

        let bundle = self.current()?;
        let features = bundle.transformer.transform_one(&record)?;

        let consent = request.consent_given;
        let (classified, looked_up) = rayon::join(
            || bundle.classifier.classify(&record),
            || {
                let compliance = self.knowledge.check_compliance(device, consent)?;
                let factors = self.knowledge.analyze_risk_factors(device, consent)?;
                Ok::<_, RiskError>((compliance, factors))
            },
        );
        let (risk_level, probabilities) = classified?;
        let (compliance_status, risk_factors) = looked_up?;

        let mitigations = self
            .knowledge
            .get_mitigation_strategies(risk_level.value() as i64)?;

        log::debug!(
            "Assessed device {}: level {}, compliance {}",
            device.id,
            risk_level,
            compliance_status
        );

        Ok(AssessmentResult {
            id: Uuid::new_v4(),
            device_id: device.id.clone(),
            timestamp: Utc::now(),
            risk_level,
            probabilities,
            mitigations,
            compliance_status,
            risk_factors,
            features,
        })
    }
}

impl Default for AssessmentEngine<InMemoryKnowledgeStore> {
    fn default() -> Self {
        Self::new(KnowledgeBaseHandler::default())
    }
}

/// Request record with the device's own attributes laid over it
pub fn assemble_record(device: &Device, request: &AssessmentRequest) -> RiskResult<Record> {
    let mut record = request.record.clone();
    record.device_id = Some(device.id.clone());
    record.device_type = device.device_type;
    record.location_type = device.location_type;
    record.data_type = device.primary_data_type()?;
    record.network_security_level = device.network_security_level;
    record.user_consent = request.consent_given;
    if let Some(sensitivity) = request.data_sensitivity {
        record.data_sensitivity = sensitivity;
    }
    Ok(record)
}
