//! Dataset Module - Corpora and Training
//!
//! ## Structure
//! - `synthetic`: seeded corpus generator, split, corpus summary
//! - `corpus`: CSV read/write of labelled and raw corpora
//! - `training`: transformer + classifier training pipeline
//!
//! ## Usage
//! ```ignore
//! use crate::logic::dataset::{generate_corpus, train_pipeline};
//!
//! let corpus = generate_corpus(1000, 42);
//! let (bundle, report) = train_pipeline(&corpus, &EngineConfig::from_env())?;
//! engine.publish(bundle);
//! ```

pub mod synthetic;
pub mod corpus;
pub mod training;


pub use corpus::{
    corpus_header, read_corpus, read_corpus_from, read_raw, read_raw_from, write_corpus,
    write_corpus_to,
};
pub use synthetic::{generate_corpus, random_record, split_corpus, CorpusSummary, NumericSummary};
pub use training::{accuracy, train_and_save, train_pipeline, TrainingReport};
