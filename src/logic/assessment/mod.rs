//! Assessment Module - Orchestration
//!
//! ## Structure
//! - `types`: request, result, history entry
//! - `bundle`: transformer + classifier published as one unit
//! - `engine`: per-request pipeline over the published bundle
//! - `repository`: `Repository` capability and in-memory maps
//! - `service`: engine composed with device and history repositories

pub mod types;
pub mod bundle;
pub mod engine;
pub mod repository;
pub mod service;


pub use bundle::ModelBundle;
pub use engine::{assemble_record, AssessmentEngine};
pub use repository::{InMemoryRepository, Repository};
pub use service::AssessmentService;
pub use types::{AssessmentRequest, AssessmentResult, HistoryEntry, Identified};
