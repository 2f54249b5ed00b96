//! Scoring Module
//!
//! Rule-based risk labelling used to produce training labels.
//!
//! ## Structure
//! - `rules`: sensitivity tables, penalties, normalization constant
//! - `heuristic`: score, breakdown, corpus labelling
//!
//! ## Usage
//! ```ignore
//! use crate::logic::scoring::{risk_score, score_breakdown};
//!
//! let level = risk_score(&record);
//! for c in score_breakdown(&record).drivers() {
//!     println!("{}: +{}", c.factor, c.points);
//! }
//! ```

pub mod rules;
pub mod heuristic;

#[cfg(test)]
mod tests;

pub use heuristic::{
    label_corpus, label_records, normalize, risk_score, score_breakdown, score_raw, Contribution,
    ScoreBreakdown,
};
