//! Registered IoT device

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::NumericField;
use super::types::{DataType, DeviceType, LocationType};
use crate::logic::error::{RiskError, RiskResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub device_type: DeviceType,
    /// Free-text installation site
    pub location: String,
    pub location_type: LocationType,
    /// Handled data types; the first one is the primary type
    pub data_types: Vec<DataType>,
    pub network_security_level: u8,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Device {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        device_type: DeviceType,
        location: impl Into<String>,
        location_type: LocationType,
        data_types: Vec<DataType>,
        network_security_level: u8,
    ) -> RiskResult<Self> {
        let now = Utc::now();
        let device = Self {
            id: id.into(),
            name: name.into(),
            device_type,
            location: location.into(),
            location_type,
            data_types,
            network_security_level,
            description: None,
            created_at: now,
            updated_at: now,
        };
        device.validate()?;
        Ok(device)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Non-empty data types, security level within 1-5
    pub fn validate(&self) -> RiskResult<()> {
        if self.data_types.is_empty() {
            return Err(RiskError::MissingField("data_types"));
        }
        let field = NumericField::NetworkSecurityLevel;
        let (min, max) = field.domain();
        let level = self.network_security_level as i64;
        if level < min || level > max {
            return Err(RiskError::OutOfRange {
                field: field.name(),
                value: level,
                min,
                max,
            });
        }
        Ok(())
    }

    /// First listed data type
    pub fn primary_data_type(&self) -> RiskResult<DataType> {
        self.data_types
            .first()
            .copied()
            .ok_or(RiskError::MissingField("data_types"))
    }

    pub fn handles(&self, data_type: DataType) -> bool {
        self.data_types.contains(&data_type)
    }
}
