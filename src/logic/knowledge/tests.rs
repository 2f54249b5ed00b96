//! Knowledge base tests

#[cfg(test)]
mod handler_tests {
    use crate::logic::error::RiskError;
    use crate::logic::knowledge::*;
    use crate::logic::record::fixtures::{camera_device, sensor_device};
    use crate::logic::record::*;

    fn handler() -> KnowledgeBaseHandler {
        KnowledgeBaseHandler::default()
    }

    #[test]
    fn test_mitigations_per_level() {
        let handler = handler();
        for level in 1..=5 {
            let strategies = handler.get_mitigation_strategies(level).unwrap();
            assert_eq!(strategies.len(), 3, "level {level}");
        }
        assert_eq!(
            handler.get_mitigation_strategies(1).unwrap()[0],
            "Maintain current privacy controls"
        );
    }

    #[test]
    fn test_mitigation_level_out_of_range() {
        let handler = handler();
        assert!(matches!(
            handler.get_mitigation_strategies(0),
            Err(RiskError::InvalidRiskLevel(0))
        ));
        assert!(handler.get_mitigation_strategies(6).unwrap_err().is_validation());
    }

    #[test]
    fn test_added_mitigation_keeps_registration_order() {
        let handler = handler();
        handler.add_mitigation(3, "Rotate device credentials").unwrap();
        let strategies = handler.get_mitigation_strategies(3).unwrap();
        assert_eq!(strategies.len(), 4);
        assert_eq!(strategies.last().unwrap(), "Rotate device credentials");
        assert!(handler.add_mitigation(9, "nope").is_err());
    }

    #[test]
    fn test_compliance_rules_first_match() {
        let handler = handler();
        let camera = camera_device();
        let sensor = sensor_device();

        // video without consent
        assert_eq!(handler.check_compliance(&camera, false).unwrap(), ComplianceStatus::NonCompliant);
        // consent given, but security level 2
        assert_eq!(
            handler.check_compliance(&camera, true).unwrap(),
            ComplianceStatus::PartiallyCompliant
        );
        // non-sensitive data without consent
        assert_eq!(
            handler.check_compliance(&sensor, false).unwrap(),
            ComplianceStatus::PartiallyCompliant
        );
        assert_eq!(handler.check_compliance(&sensor, true).unwrap(), ComplianceStatus::Compliant);
    }

    #[test]
    fn test_risk_factors_in_unit_range() {
        let handler = handler();
        let factors = handler.analyze_risk_factors(&camera_device(), false).unwrap();

        assert_eq!(factors.data_sensitivity, 1.0); // video
        assert_eq!(factors.consent, 1.0);
        assert!((factors.location_risk - 0.6).abs() < 1e-12);
        assert!((factors.device_risk - 0.8).abs() < 1e-12);
        assert!((factors.network_security - 0.75).abs() < 1e-12);
        assert!(factors.iter().all(|(_, v)| (0.0..=1.0).contains(&v)));

        let secure = handler.analyze_risk_factors(&sensor_device(), true).unwrap();
        assert_eq!(secure.consent, 0.0);
        assert_eq!(secure.network_security, 0.0);
        assert!((secure.data_sensitivity - 0.2).abs() < 1e-12);
        assert_eq!(secure.dominant(), "location_risk");
    }

    #[test]
    fn test_invalid_device_rejected() {
        let handler = handler();
        let mut device = camera_device();
        device.data_types.clear();
        assert!(handler.check_compliance(&device, true).is_err());
        assert!(handler.analyze_risk_factors(&device, true).is_err());
    }

    #[test]
    fn test_missing_weight_is_an_error() {
        let mut doc = default_knowledge_base();
        doc.weights.device.remove(&DeviceType::Camera);
        let handler = KnowledgeBaseHandler::new(InMemoryKnowledgeStore::new(doc));

        assert!(matches!(
            handler.analyze_risk_factors(&camera_device(), true),
            Err(RiskError::UnknownCategory { field: "device_type", .. })
        ));
    }

    #[test]
    fn test_risks_and_levels() {
        let handler = handler();
        handler.add_risk("location_tracking", 4).unwrap();
        assert!(matches!(handler.add_risk("bogus", 7), Err(RiskError::InvalidRiskLevel(7))));
        assert!(matches!(
            handler.add_risk("location_tracking", 2),
            Err(RiskError::AlreadyExists(_))
        ));

        let levels = handler.get_risk_levels();
        assert_eq!(levels["data_breach"], RiskLevel::Critical);
        assert_eq!(levels["location_tracking"], RiskLevel::VeryHigh);
        assert_eq!(handler.get_risks(None).len(), 3);
    }

    #[test]
    fn test_get_risk_by_id() {
        let handler = handler();
        let risk = PrivacyRisk::new("mic_leak", RiskLevel::High, "Audio uploaded without consent")
            .with_data_types(vec![DataType::Audio])
            .with_devices(vec!["speaker_1".to_string(), "speaker_2".to_string()])
            .with_mitigation("Disable cloud upload");
        handler.register_risk(risk.clone()).unwrap();

        let stored = handler.get_risk("mic_leak").unwrap();
        assert_eq!(stored, risk);
        assert_eq!(stored.status, RiskStatus::Active);
        assert_eq!(stored.affected_devices.len(), 2);
        assert!(stored.resolved_at.is_none());
        assert!(handler.get_risk("absent").is_none());
    }

    #[test]
    fn test_risks_filtered_by_status() {
        let handler = handler();
        let mut mitigated = PrivacyRisk::new("weak_wifi", RiskLevel::Medium, "WPA2 only");
        mitigated.status = RiskStatus::Mitigated;
        handler.register_risk(mitigated).unwrap();
        handler.resolve_risk("data_breach").unwrap();

        let ids = |status| -> Vec<String> {
            handler.get_risks(Some(status)).into_iter().map(|r| r.id).collect()
        };
        assert_eq!(ids(RiskStatus::Active), vec!["unauthorized_access"]);
        assert_eq!(ids(RiskStatus::Mitigated), vec!["weak_wifi"]);
        assert_eq!(ids(RiskStatus::Resolved), vec!["data_breach"]);
        assert_eq!(handler.get_risks(None).len(), 3);
    }

    #[test]
    fn test_resolve_risk() {
        let handler = handler();
        let resolved = handler.resolve_risk("unauthorized_access").unwrap();
        assert!(resolved.is_resolved());
        let first = resolved.resolved_at.unwrap();
        assert!(first >= resolved.detected_at);

        // resolving again keeps the first resolution time
        let again = handler.resolve_risk("unauthorized_access").unwrap();
        assert_eq!(again.resolved_at, Some(first));
        assert_eq!(handler.get_risk("unauthorized_access").unwrap(), again);

        assert!(matches!(handler.resolve_risk("absent"), Err(RiskError::NotFound(_))));
    }

    #[test]
    fn test_risk_status_wire_names() {
        assert_eq!(serde_json::to_string(&RiskStatus::Mitigated).unwrap(), "\"mitigated\"");
        assert_eq!(RiskStatus::Resolved.as_str(), "resolved");

        // older documents carry only id, level and detection time
        let risk: PrivacyRisk = serde_json::from_str(
            r#"{"id": "r-1", "level": 3, "detected_at": "2024-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(risk.status, RiskStatus::Active);
        assert!(risk.affected_data_types.is_empty());
        assert!(risk.mitigation_strategy.is_none());
    }

    #[test]
    fn test_policies() {
        let handler = handler();
        let policy = PrivacyPolicy::new("p-1", "Video retention", "Delete footage", vec![DataType::Video], 30);
        handler.add_policy(policy.clone()).unwrap();
        assert!(matches!(handler.add_policy(policy), Err(RiskError::AlreadyExists(_))));

        assert_eq!(handler.get_policy("p-1").unwrap().retention_period, 30);
        assert!(handler.get_policy("p-2").is_none());
    }

    #[test]
    fn test_policy_update_keeps_creation_time() {
        let handler = handler();
        let original = PrivacyPolicy::new("p-1", "Video retention", "Delete footage", vec![DataType::Video], 30);
        handler.add_policy(original.clone()).unwrap();

        let mut edited = PrivacyPolicy::new("p-1", "Video and audio", "Delete recordings", vec![DataType::Video, DataType::Audio], 14);
        edited.compliance_requirements.push("GDPR Art. 5(1)(e)".to_string());
        let updated = handler.update_policy(edited).unwrap();

        assert_eq!(updated.name, "Video and audio");
        assert_eq!(updated.retention_period, 14);
        assert_eq!(updated.data_types.len(), 2);
        assert_eq!(updated.compliance_requirements, vec!["GDPR Art. 5(1)(e)"]);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(handler.get_policy("p-1").unwrap(), updated);

        let unknown = PrivacyPolicy::new("p-9", "x", "y", vec![DataType::Temperature], 1);
        assert!(matches!(handler.update_policy(unknown), Err(RiskError::NotFound(_))));
    }

    #[test]
    fn test_access_rules_and_retention() {
        let handler = handler();
        handler
            .add_policy(PrivacyPolicy::new("p-1", "Camera", "Footage access", vec![DataType::Video], 30))
            .unwrap();

        let rule = serde_json::json!({"role": "security", "action": "read"});
        let rule: AccessRule = rule.as_object().unwrap().clone();
        let policy = handler.add_access_rule("p-1", rule.clone()).unwrap();
        assert_eq!(policy.access_control_rules, vec![rule]);

        let policy = handler.update_retention_period("p-1", 7).unwrap();
        assert_eq!(policy.retention_period, 7);
        assert_eq!(policy.access_control_rules.len(), 1);
        assert!(policy.updated_at >= policy.created_at);

        assert!(matches!(
            handler.add_access_rule("p-2", AccessRule::new()),
            Err(RiskError::NotFound(_))
        ));
        assert!(handler.update_retention_period("p-2", 7).is_err());
    }

    #[test]
    fn test_personal_data_types_deduplicated() {
        let handler = handler();
        let before = handler.get_personal_data_types().len();
        handler.add_personal_data("biometrics");
        handler.add_personal_data("biometrics");
        assert_eq!(handler.get_personal_data_types().len(), before + 1);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb").join("knowledge.json");

        let handler = handler();
        handler.add_risk("location_tracking", 4).unwrap();
        handler.save(&path).unwrap();

        let reloaded = KnowledgeBaseHandler::new(InMemoryKnowledgeStore::load(&path).unwrap());
        assert_eq!(reloaded.store().snapshot(), handler.store().snapshot());
        assert_eq!(
            reloaded.check_compliance(&camera_device(), false).unwrap(),
            ComplianceStatus::NonCompliant
        );

        assert!(matches!(
            InMemoryKnowledgeStore::load(&dir.path().join("absent.json")),
            Err(RiskError::StateNotFound(_))
        ));
    }

    #[test]
    fn test_weights_mirror_heuristic_tables() {
        use crate::logic::scoring::rules::{data_risk, device_risk};
        let weights = default_knowledge_base().weights;
        for d in DeviceType::ALL {
            assert_eq!(weights.device[d] as i64, device_risk(*d));
        }
        for d in DataType::ALL {
            assert_eq!(weights.data[d] as i64, data_risk(*d));
        }
    }
}
