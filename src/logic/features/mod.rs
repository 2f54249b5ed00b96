//! Features Module - Record → Numeric Vector
//!
//! ## Structure
//! - `layout`: column order, version and CRC32 layout hash
//! - `transformer`: fitted encoding tables and scaling statistics

pub mod layout;
pub mod transformer;

#[cfg(test)]
mod tests;

pub use layout::{layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use transformer::{CategoryEncoding, FeatureTransformer, NumericScaler};
