//! Knowledge Base Handler
//!
//! Validating facade over a `KnowledgeStore`. Integer risk levels coming
//! from callers are checked here; the store only ever sees `RiskLevel`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::store::{InMemoryKnowledgeStore, KnowledgeStore};
use super::types::{AccessRule, PrivacyPolicy, PrivacyRisk, RiskFactors, RiskStatus};
use crate::logic::error::RiskResult;
use crate::logic::record::{ComplianceStatus, Device, RiskLevel};

pub struct KnowledgeBaseHandler<K: KnowledgeStore = InMemoryKnowledgeStore> {
    store: Arc<K>,
}

impl<K: KnowledgeStore> Clone for KnowledgeBaseHandler<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<K: KnowledgeStore> KnowledgeBaseHandler<K> {
    pub fn new(store: K) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_shared(store: Arc<K>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Strategies for a level in 1-5, registration order
    pub fn get_mitigation_strategies(&self, risk_level: i64) -> RiskResult<Vec<String>> {
        let level = RiskLevel::from_value(risk_level)?;
        Ok(self.store.mitigations_for(level))
    }

    pub fn check_compliance(&self, device: &Device, consent_given: bool) -> RiskResult<ComplianceStatus> {
        device.validate()?;
        Ok(self.store.compliance_for(device, consent_given))
    }

    pub fn analyze_risk_factors(&self, device: &Device, consent_given: bool) -> RiskResult<RiskFactors> {
        device.validate()?;
        self.store.factors_for(device, consent_given)
    }

    // ------------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------------

    pub fn add_mitigation(&self, risk_level: i64, description: impl Into<String>) -> RiskResult<()> {
        let level = RiskLevel::from_value(risk_level)?;
        self.store.add_mitigation(level, description.into());
        Ok(())
    }

    /// Register an active risk whose id is `name`
    pub fn add_risk(&self, name: impl Into<String>, risk_level: i64) -> RiskResult<()> {
        let level = RiskLevel::from_value(risk_level)?;
        let name = name.into();
        self.store.add_risk(PrivacyRisk::new(name.clone(), level, name))
    }

    pub fn register_risk(&self, risk: PrivacyRisk) -> RiskResult<()> {
        self.store.add_risk(risk)
    }

    pub fn get_risk(&self, id: &str) -> Option<PrivacyRisk> {
        self.store.risk(id)
    }

    pub fn resolve_risk(&self, id: &str) -> RiskResult<PrivacyRisk> {
        self.store.resolve_risk(id)
    }

    pub fn add_policy(&self, policy: PrivacyPolicy) -> RiskResult<()> {
        self.store.add_policy(policy)
    }

    pub fn get_policy(&self, id: &str) -> Option<PrivacyPolicy> {
        self.store.policy(id)
    }

    /// Replace a stored policy; its `created_at` is kept
    pub fn update_policy(&self, policy: PrivacyPolicy) -> RiskResult<PrivacyPolicy> {
        self.store.update_policy(policy)
    }

    pub fn add_access_rule(&self, policy_id: &str, rule: AccessRule) -> RiskResult<PrivacyPolicy> {
        let mut rule = Some(rule);
        self.store.modify_policy(policy_id, &mut |policy: &mut PrivacyPolicy| {
            if let Some(rule) = rule.take() {
                policy.add_access_rule(rule);
            }
        })
    }

    pub fn update_retention_period(&self, policy_id: &str, days: u32) -> RiskResult<PrivacyPolicy> {
        self.store
            .modify_policy(policy_id, &mut |policy: &mut PrivacyPolicy| policy.update_retention_period(days))
    }

    pub fn add_personal_data(&self, data_type: impl Into<String>) {
        self.store.add_personal_data(data_type.into());
    }

    pub fn get_personal_data_types(&self) -> Vec<String> {
        self.store.personal_data_types()
    }

    /// All risks, or only those with `status`
    pub fn get_risks(&self, status: Option<RiskStatus>) -> Vec<PrivacyRisk> {
        self.store.risks(status)
    }

    pub fn get_risk_levels(&self) -> BTreeMap<String, RiskLevel> {
        self.store.risk_levels()
    }

    pub fn save(&self, path: &Path) -> RiskResult<()> {
        self.store.save(path)
    }
}

impl Default for KnowledgeBaseHandler<InMemoryKnowledgeStore> {
    fn default() -> Self {
        Self::new(InMemoryKnowledgeStore::with_defaults())
    }
}
