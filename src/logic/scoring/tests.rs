//! Heuristic scoring tests

#[cfg(test)]
mod heuristic_tests {
    use proptest::prelude::*;

    use crate::logic::error::RiskError;
    use crate::logic::record::fixtures::{best_case, sensor, worst_case};
    use crate::logic::record::*;
    use crate::logic::scoring::*;

    #[test]
    fn test_worst_case_is_critical() {
        let breakdown = score_breakdown(&worst_case());
        assert_eq!(breakdown.raw_score, 50);
        assert_eq!(breakdown.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_best_case_is_low() {
        let breakdown = score_breakdown(&best_case());
        // camera + video + public space alone add 12
        assert_eq!(breakdown.raw_score, 15);
        assert_eq!(risk_score(&best_case()), RiskLevel::Low);
    }

    #[test]
    fn test_mixed_sensor() {
        let breakdown = score_breakdown(&sensor());
        assert_eq!(breakdown.raw_score, 19);
        assert_eq!(breakdown.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_breakdown_names_every_contribution() {
        let breakdown = score_breakdown(&worst_case());
        assert_eq!(breakdown.contributions.len(), 18);
        let sum: i64 = breakdown.contributions.iter().map(|c| c.points).sum();
        assert_eq!(sum, breakdown.raw_score);

        let drivers = breakdown.drivers();
        assert_eq!(drivers[0].points, 5);
        assert!(drivers.windows(2).all(|w| w[0].points >= w[1].points));
    }

    #[test]
    fn test_best_case_drivers_are_fixed_context_only() {
        let breakdown = score_breakdown(&best_case());
        let names: Vec<&str> = breakdown.drivers().iter().map(|c| c.factor).collect();
        assert!(names.contains(&"device_type"));
        assert!(!names.contains(&"user_consent"));
        assert!(!names.contains(&"data_sharing"));
    }

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize(0), RiskLevel::Low);
        assert_eq!(normalize(15), RiskLevel::Low);
        assert_eq!(normalize(16), RiskLevel::Medium);
        assert_eq!(normalize(39), RiskLevel::VeryHigh);
        assert_eq!(normalize(40), RiskLevel::Critical);
        assert_eq!(normalize(400), RiskLevel::Critical);
    }

    #[test]
    fn test_score_raw_unknown_category() {
        let mut raw = worst_case().to_raw();
        raw.insert("device_type", "toaster");
        assert!(matches!(
            score_raw(&raw),
            Err(RiskError::UnknownCategory { field: "device_type", .. })
        ));

        raw.insert("device_type", "camera");
        assert_eq!(score_raw(&raw).unwrap(), RiskLevel::Critical);
    }

    #[test]
    fn test_label_corpus_reports_failing_row() {
        let mut bad = sensor().to_raw();
        bad.remove("purpose_limitation");
        let rows = vec![worst_case().to_raw(), best_case().to_raw(), bad];

        match label_corpus(&rows).unwrap_err() {
            RiskError::Labeling { row, source } => {
                assert_eq!(row, 2);
                assert!(matches!(*source, RiskError::MissingField("purpose_limitation")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_label_corpus_labels_in_order() {
        let rows = vec![worst_case().to_raw(), best_case().to_raw()];
        let labeled = label_corpus(&rows).unwrap();
        assert_eq!(labeled[0].risk_level, RiskLevel::Critical);
        assert_eq!(labeled[1].risk_level, RiskLevel::Low);
        assert_eq!(labeled[1].record, best_case());
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    fn pick<T: Copy + std::fmt::Debug + 'static>(all: &'static [T]) -> impl Strategy<Value = T> {
        proptest::sample::select(all)
    }

    prop_compose! {
        fn arb_record()(
            categories in (
                pick(DeviceType::ALL),
                pick(DataType::ALL),
                pick(LocationType::ALL),
                pick(AccessPattern::ALL),
                pick(DataSharing::ALL),
                pick(ComplianceStatus::ALL),
            ),
            numbers in (
                0u32..1000,
                1u8..=5,
                1u8..=5,
                1u8..=3,
                0u32..1000,
                0u32..10_000,
                0u32..365,
                0u32..1000,
                0u32..50,
            ),
            flags in proptest::collection::vec(any::<bool>(), 7),
        ) -> Record {
            let (device_type, data_type, location_type, access_pattern, data_sharing, compliance_status) = categories;
            let (access_frequency, network_security_level, data_sensitivity, encryption_level,
                 retention_period, data_volume, last_audit_days, storage_duration, security_incidents) = numbers;
            Record {
                device_id: None,
                device_type,
                data_type,
                location_type,
                access_pattern,
                data_sharing,
                compliance_status,
                access_frequency,
                network_security_level,
                data_sensitivity,
                encryption_level,
                retention_period,
                data_volume,
                last_audit_days,
                storage_duration,
                security_incidents,
                user_consent: flags[0],
                data_anonymization: flags[1],
                data_pseudonymization: flags[2],
                data_minimization: flags[3],
                purpose_limitation: flags[4],
                privacy_impact_assessment: flags[5],
                data_protection_officer: flags[6],
            }
        }
    }

    proptest! {
        #[test]
        fn prop_level_always_in_range(record in arb_record()) {
            let level = risk_score(&record).value();
            prop_assert!((1..=5).contains(&level));
        }

        #[test]
        fn prop_scoring_is_deterministic(record in arb_record()) {
            prop_assert_eq!(risk_score(&record), risk_score(&record.clone()));
        }

        #[test]
        fn prop_raw_and_typed_paths_agree(record in arb_record()) {
            prop_assert_eq!(score_raw(&record.to_raw()).unwrap(), risk_score(&record));
        }

        #[test]
        fn prop_revoking_consent_never_lowers_risk(record in arb_record()) {
            let with = Record { user_consent: true, ..record.clone() };
            let without = Record { user_consent: false, ..record };
            prop_assert!(risk_score(&without) >= risk_score(&with));
        }
    }
}
