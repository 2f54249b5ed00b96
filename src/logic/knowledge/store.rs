//! Knowledge Store - capability trait and in-memory implementation

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use parking_lot::RwLock;

use super::defaults::default_knowledge_base;
use super::types::{
    KnowledgeBase, MitigationStrategy, PrivacyPolicy, PrivacyRisk, RiskFactors, RiskStatus,
};
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::record::{ComplianceStatus, Device, RiskLevel};

/// Read-mostly store of privacy knowledge. Entries are keyed by id and
/// never removed; risks are resolved and policies are edited in place.
pub trait KnowledgeStore: Send + Sync {
    fn mitigations_for(&self, level: RiskLevel) -> Vec<String>;
    fn compliance_for(&self, device: &Device, consent_given: bool) -> ComplianceStatus;
    fn factors_for(&self, device: &Device, consent_given: bool) -> RiskResult<RiskFactors>;

    fn add_mitigation(&self, level: RiskLevel, description: String);
    /// Fails with `AlreadyExists` on a duplicate id
    fn add_risk(&self, risk: PrivacyRisk) -> RiskResult<()>;
    /// Fails with `NotFound` for an unknown id
    fn resolve_risk(&self, id: &str) -> RiskResult<PrivacyRisk>;
    /// Fails with `AlreadyExists` on a duplicate id
    fn add_policy(&self, policy: PrivacyPolicy) -> RiskResult<()>;
    /// Replace the editable fields of the policy with the same id
    fn update_policy(&self, policy: PrivacyPolicy) -> RiskResult<PrivacyPolicy>;
    /// Edit one policy under the write lock, returning the result
    fn modify_policy(&self, id: &str, edit: &mut dyn FnMut(&mut PrivacyPolicy)) -> RiskResult<PrivacyPolicy>;
    fn add_personal_data(&self, data_type: String);

    fn risk(&self, id: &str) -> Option<PrivacyRisk>;
    /// All risks, or only those with `status`
    fn risks(&self, status: Option<RiskStatus>) -> Vec<PrivacyRisk>;
    fn risk_levels(&self) -> BTreeMap<String, RiskLevel>;
    fn policy(&self, id: &str) -> Option<PrivacyPolicy>;
    fn personal_data_types(&self) -> Vec<String>;

    /// Copy of the whole document
    fn snapshot(&self) -> KnowledgeBase;

    /// Write the document as pretty JSON
    fn save(&self, path: &Path) -> RiskResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(&self.snapshot())?)?;
        log::info!("Saved knowledge base to {}", path.display());
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Knowledge base document behind a read/write lock
#[derive(Debug)]
pub struct InMemoryKnowledgeStore {
    doc: RwLock<KnowledgeBase>,
}

impl InMemoryKnowledgeStore {
    pub fn new(doc: KnowledgeBase) -> Self {
        Self {
            doc: RwLock::new(doc),
        }
    }

    /// Seeded with the built-in strategies, rules and weights
    pub fn with_defaults() -> Self {
        Self::new(default_knowledge_base())
    }

    /// Read a JSON document; a missing file is `StateNotFound`
    pub fn load(path: &Path) -> RiskResult<Self> {
        if !path.exists() {
            return Err(RiskError::StateNotFound(path.to_path_buf()));
        }
        let doc: KnowledgeBase = serde_json::from_slice(&fs::read(path)?)?;
        log::info!(
            "Loaded knowledge base from {} ({} strategies, {} rules)",
            path.display(),
            doc.mitigations.len(),
            doc.compliance_rules.len()
        );
        Ok(Self::new(doc))
    }
}

impl Default for InMemoryKnowledgeStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl KnowledgeStore for InMemoryKnowledgeStore {
    fn mitigations_for(&self, level: RiskLevel) -> Vec<String> {
        self.doc.read().mitigations_for(level)
    }

    fn compliance_for(&self, device: &Device, consent_given: bool) -> ComplianceStatus {
        self.doc.read().compliance_for(device, consent_given)
    }

    fn factors_for(&self, device: &Device, consent_given: bool) -> RiskResult<RiskFactors> {
        self.doc.read().factors_for(device, consent_given)
    }

    fn add_mitigation(&self, level: RiskLevel, description: String) {
        self.doc.write().mitigations.push(MitigationStrategy {
            risk_level: level,
            description,
        });
    }

    fn add_risk(&self, risk: PrivacyRisk) -> RiskResult<()> {
        let mut doc = self.doc.write();
        if doc.risks.iter().any(|r| r.id == risk.id) {
            return Err(RiskError::AlreadyExists(format!("risk {}", risk.id)));
        }
        log::debug!("Registered risk {} ({})", risk.id, risk.level.as_str());
        doc.risks.push(risk);
        Ok(())
    }

    fn resolve_risk(&self, id: &str) -> RiskResult<PrivacyRisk> {
        let mut doc = self.doc.write();
        let risk = doc
            .risks
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RiskError::NotFound(format!("risk {}", id)))?;
        risk.resolve();
        log::info!("Resolved risk {}", id);
        Ok(risk.clone())
    }

    fn add_policy(&self, policy: PrivacyPolicy) -> RiskResult<()> {
        let mut doc = self.doc.write();
        if doc.policies.iter().any(|p| p.id == policy.id) {
            return Err(RiskError::AlreadyExists(format!("policy {}", policy.id)));
        }
        doc.policies.push(policy);
        Ok(())
    }

    fn update_policy(&self, policy: PrivacyPolicy) -> RiskResult<PrivacyPolicy> {
        let id = policy.id.clone();
        let mut update = Some(policy);
        self.modify_policy(&id, &mut |current: &mut PrivacyPolicy| {
            if let Some(update) = update.take() {
                current.apply_update(update);
            }
        })
    }

    fn modify_policy(&self, id: &str, edit: &mut dyn FnMut(&mut PrivacyPolicy)) -> RiskResult<PrivacyPolicy> {
        let mut doc = self.doc.write();
        let policy = doc
            .policies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RiskError::NotFound(format!("policy {}", id)))?;
        edit(policy);
        Ok(policy.clone())
    }

    fn add_personal_data(&self, data_type: String) {
        let mut doc = self.doc.write();
        if !doc.personal_data_types.contains(&data_type) {
            doc.personal_data_types.push(data_type);
        }
    }

    fn risk(&self, id: &str) -> Option<PrivacyRisk> {
        self.doc.read().risks.iter().find(|r| r.id == id).cloned()
    }

    fn risks(&self, status: Option<RiskStatus>) -> Vec<PrivacyRisk> {
        self.doc
            .read()
            .risks
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect()
    }

    fn risk_levels(&self) -> BTreeMap<String, RiskLevel> {
        self.doc
            .read()
            .risks
            .iter()
            .map(|r| (r.id.clone(), r.level))
            .collect()
    }

    fn policy(&self, id: &str) -> Option<PrivacyPolicy> {
        self.doc.read().policies.iter().find(|p| p.id == id).cloned()
    }

    fn personal_data_types(&self) -> Vec<String> {
        self.doc.read().personal_data_types.clone()
    }

    fn snapshot(&self) -> KnowledgeBase {
        self.doc.read().clone()
    }
}
