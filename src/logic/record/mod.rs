//! Record Module
//!
//! Typed device/context observations and their validation boundary.
//!
//! ## Structure
//! - `types`: closed vocabularies (DeviceType, DataType, ...) and RiskLevel
//! - `fields`: field catalogue in feature-layout order
//! - `observation`: Record, RawRecord, FeatureSource, LabeledRecord
//! - `device`: registered device metadata

pub mod types;
pub mod fields;
pub mod observation;
pub mod device;

#[cfg(test)]
pub(crate) mod fixtures;


pub use types::{
    AccessPattern, ComplianceStatus, DataSharing, DataType, DeviceType, LocationType, RiskLevel,
};
pub use fields::{BooleanField, CategoricalField, NumericField, DEVICE_ID_FIELD, LABEL_FIELD};
pub use device::Device;
pub use observation::{parse_flag, FeatureSource, LabeledRecord, RawRecord, Record};
