//! Shared test records

use super::types::*;
use super::device::Device;
use super::observation::Record;

/// Every field at its riskiest value
pub fn worst_case() -> Record {
    Record {
        device_id: Some("device_worst".to_string()),
        device_type: DeviceType::Camera,
        data_type: DataType::Video,
        location_type: LocationType::PublicSpace,
        access_pattern: AccessPattern::Burst,
        data_sharing: DataSharing::External,
        compliance_status: ComplianceStatus::NonCompliant,
        access_frequency: 99,
        network_security_level: 1,
        data_sensitivity: 5,
        encryption_level: 1,
        retention_period: 364,
        data_volume: 999,
        last_audit_days: 89,
        storage_duration: 364,
        security_incidents: 4,
        user_consent: false,
        data_anonymization: false,
        data_pseudonymization: false,
        data_minimization: false,
        purpose_limitation: false,
        privacy_impact_assessment: false,
        data_protection_officer: false,
    }
}

/// Same device, every control in place
pub fn best_case() -> Record {
    Record {
        device_id: Some("device_best".to_string()),
        access_pattern: AccessPattern::Regular,
        data_sharing: DataSharing::None,
        compliance_status: ComplianceStatus::Compliant,
        access_frequency: 1,
        network_security_level: 5,
        data_sensitivity: 1,
        encryption_level: 3,
        retention_period: 1,
        data_volume: 1,
        last_audit_days: 7,
        storage_duration: 1,
        security_incidents: 0,
        user_consent: true,
        data_anonymization: true,
        data_pseudonymization: true,
        data_minimization: true,
        purpose_limitation: true,
        privacy_impact_assessment: true,
        data_protection_officer: true,
        ..worst_case()
    }
}

/// Low-risk sensor with mixed controls
pub fn sensor() -> Record {
    Record {
        device_id: Some("device_sensor".to_string()),
        device_type: DeviceType::Sensor,
        data_type: DataType::Temperature,
        location_type: LocationType::SemiPublic,
        access_pattern: AccessPattern::Irregular,
        data_sharing: DataSharing::Internal,
        compliance_status: ComplianceStatus::PartiallyCompliant,
        access_frequency: 20,
        network_security_level: 3,
        data_sensitivity: 2,
        encryption_level: 2,
        retention_period: 90,
        data_volume: 120,
        last_audit_days: 45,
        storage_duration: 60,
        security_incidents: 1,
        data_pseudonymization: false,
        ..best_case()
    }
}

/// Public-space camera streaming video and audio over a weak network
pub fn camera_device() -> Device {
    Device::new(
        "cam-lobby",
        "Lobby camera",
        DeviceType::Camera,
        "Main lobby",
        LocationType::PublicSpace,
        vec![DataType::Video, DataType::Audio],
        2,
    )
    .unwrap()
}

/// Well secured climate sensor
pub fn sensor_device() -> Device {
    Device::new(
        "sensor-7",
        "Climate sensor",
        DeviceType::Sensor,
        "Server room",
        LocationType::Restricted,
        vec![DataType::Temperature, DataType::Humidity],
        5,
    )
    .unwrap()
}
