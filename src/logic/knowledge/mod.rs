//! Knowledge Module - Mitigations, Compliance, Risk Factors
//!
//! ## Structure
//! - `types`: KnowledgeBase document with its risk and policy entries
//! - `defaults`: built-in strategies, compliance rules and weights
//! - `store`: `KnowledgeStore` capability and the in-memory store
//! - `handler`: validating facade used by the assessment layer

pub mod types;
pub mod defaults;
pub mod store;
pub mod handler;

#[cfg(test)]
mod tests;

pub use defaults::default_knowledge_base;
pub use handler::KnowledgeBaseHandler;
pub use store::{InMemoryKnowledgeStore, KnowledgeStore};
pub use types::{
    AccessRule, ComplianceRule, FactorWeights, KnowledgeBase, MitigationStrategy, PrivacyPolicy,
    PrivacyRisk, RiskFactors, RiskStatus,
};
