//! Logic Module - Assessment Engine
//!
//! Leaf-first: record → scoring → features → model → knowledge → assessment.
//! `dataset` sits on top for offline corpus generation and training.

pub mod error;
pub mod config;
pub mod storage;

pub mod record;
pub mod scoring;
pub mod features;
pub mod model;
pub mod knowledge;
pub mod assessment;
pub mod dataset;
