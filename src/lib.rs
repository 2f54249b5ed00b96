//! Privacy Risk Core - Library Entry Point
//!
//! Assigns a privacy-risk level (1-5) to an IoT device / data-handling
//! scenario and explains it with class probabilities, compliance status,
//! mitigation guidance and named risk factors.
//!
//! ## Layout
//! - `logic::record` - typed records and boundary validation
//! - `logic::scoring` - deterministic labelling heuristic
//! - `logic::features` - feature layout and fitted transformer
//! - `logic::model` - random forest and the risk classifier
//! - `logic::knowledge` - knowledge store and handler
//! - `logic::assessment` - orchestrator, repositories
//! - `logic::dataset` - synthetic corpora, CSV codec, training pipeline

pub mod constants;
pub mod logic;

pub use logic::error::{RiskError, RiskResult};
