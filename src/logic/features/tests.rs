//! Transformer tests: fit/transform contract and persisted state

#[cfg(test)]
mod transformer_tests {
    use crate::logic::error::RiskError;
    use crate::logic::features::layout::{feature_index, BOOLEAN_OFFSET, NUMERIC_OFFSET};
    use crate::logic::features::{FeatureTransformer, FEATURE_COUNT};
    use crate::logic::record::fixtures::{best_case, sensor, worst_case};
    use crate::logic::record::*;
    use crate::logic::storage::StateEnvelope;

    fn corpus() -> Vec<Record> {
        vec![worst_case(), best_case(), sensor()]
    }

    fn fitted() -> FeatureTransformer {
        let mut transformer = FeatureTransformer::new();
        transformer.fit(&corpus()).unwrap();
        transformer
    }

    #[test]
    fn test_transform_before_fit() {
        let transformer = FeatureTransformer::new();
        assert!(matches!(
            transformer.transform(&corpus()),
            Err(RiskError::NotFitted(_))
        ));
        assert!(transformer.save_state().unwrap_err().is_state());
    }

    #[test]
    fn test_fit_empty_corpus() {
        let mut transformer = FeatureTransformer::new();
        let empty: Vec<Record> = Vec::new();
        assert!(matches!(transformer.fit(&empty), Err(RiskError::EmptyCorpus)));
        assert!(!transformer.is_fitted());
    }

    #[test]
    fn test_output_shape_and_order() {
        let matrix = fitted().transform(&corpus()).unwrap();
        assert_eq!(matrix.dim(), (3, FEATURE_COUNT));

        // consent column: worst=false, best=true, sensor=true
        let consent = feature_index("user_consent").unwrap();
        assert_eq!(consent, BOOLEAN_OFFSET);
        assert_eq!(matrix[[0, consent]], 0.0);
        assert_eq!(matrix[[1, consent]], 1.0);
    }

    #[test]
    fn test_codes_follow_lexical_order() {
        let transformer = fitted();
        let devices = transformer.classes(CategoricalField::DeviceType).unwrap();
        assert_eq!(devices, ["camera".to_string(), "sensor".to_string()]);

        let matrix = transformer.transform(&[sensor(), worst_case()]).unwrap();
        assert_eq!(matrix[[0, 0]], 1.0); // sensor
        assert_eq!(matrix[[1, 0]], 0.0); // camera
    }

    #[test]
    fn test_numeric_columns_standardized() {
        let matrix = fitted().transform(&corpus()).unwrap();
        for col in NUMERIC_OFFSET..BOOLEAN_OFFSET {
            let column = matrix.column(col);
            let mean = column.sum() / 3.0;
            let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-9, "column {col} mean {mean}");
            assert!((var.sqrt() - 1.0).abs() < 1e-9, "column {col} std {}", var.sqrt());
        }
    }

    #[test]
    fn test_constant_column_uses_unit_std() {
        let rows = vec![best_case(), best_case()];
        let mut transformer = FeatureTransformer::new();
        let matrix = transformer.fit_transform(&rows).unwrap();

        let scaler = transformer.scaler(NumericField::DataVolume).unwrap();
        assert_eq!(scaler.std, 0.0);
        assert!(matrix.iter().all(|v| v.is_finite()));
        assert_eq!(matrix[[0, NUMERIC_OFFSET]], 0.0);
    }

    #[test]
    fn test_unseen_category_rejected() {
        let transformer = fitted();
        let wearable = Record {
            device_type: DeviceType::Wearable,
            ..sensor()
        };
        match transformer.transform_one(&wearable).unwrap_err() {
            RiskError::UnseenCategory { field, value } => {
                assert_eq!(field, "device_type");
                assert_eq!(value, "wearable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_raw_records_missing_field() {
        let raw: Vec<RawRecord> = corpus().iter().map(Record::to_raw).collect();
        let mut transformer = FeatureTransformer::new();
        transformer.fit(&raw).unwrap();

        let mut partial = sensor().to_raw();
        partial.remove("data_volume");
        assert!(matches!(
            transformer.transform_one(&partial),
            Err(RiskError::MissingField("data_volume"))
        ));

        let stripped: Vec<RawRecord> = raw
            .into_iter()
            .map(|mut r| {
                r.remove("retention_period");
                r
            })
            .collect();
        assert!(matches!(
            FeatureTransformer::new().fit(&stripped),
            Err(RiskError::MissingField("retention_period"))
        ));
    }

    #[test]
    fn test_raw_and_typed_inputs_agree() {
        let transformer = fitted();
        let typed = transformer.transform_one(&sensor()).unwrap();
        let raw = transformer.transform_one(&sensor().to_raw()).unwrap();
        assert_eq!(typed, raw);
    }

    #[test]
    fn test_raw_numbers_outside_domain_rejected() {
        let transformer = fitted();

        let mut raw = sensor().to_raw();
        raw.insert("network_security_level", "9");
        assert!(matches!(
            transformer.transform_one(&raw),
            Err(RiskError::OutOfRange { field: "network_security_level", value: 9, min: 1, max: 5 })
        ));

        let mut raw = sensor().to_raw();
        raw.insert("data_sensitivity", "-3");
        assert!(matches!(
            transformer.transform_one(&raw),
            Err(RiskError::OutOfRange { field: "data_sensitivity", .. })
        ));

        let mut raw = sensor().to_raw();
        raw.insert("encryption_level", "2.5");
        assert!(matches!(
            transformer.transform(&[raw]),
            Err(RiskError::InvalidValue { field: "encryption_level", .. })
        ));
    }

    #[test]
    fn test_state_round_trip_is_bit_exact() {
        let transformer = fitted();
        let blob = transformer.save_state().unwrap();
        let restored = FeatureTransformer::load_state(&blob).unwrap();

        assert_eq!(restored, transformer);
        assert_eq!(
            restored.transform(&corpus()).unwrap(),
            transformer.transform(&corpus()).unwrap()
        );
    }

    #[test]
    fn test_corrupt_blob_rejected() {
        let blob = fitted().save_state().unwrap();
        let truncated = &blob[..blob.len() / 2];
        assert!(FeatureTransformer::load_state(truncated).unwrap_err().is_state());

        let mut envelope: StateEnvelope = serde_json::from_slice(&blob).unwrap();
        envelope.payload["scalers"][0]["mean"] = serde_json::json!(123.0);
        let tampered = serde_json::to_vec(&envelope).unwrap();
        assert!(matches!(
            FeatureTransformer::load_state(&tampered),
            Err(RiskError::CorruptState(_))
        ));
    }

    #[test]
    fn test_unsorted_classes_rejected_even_when_resigned() {
        use crate::logic::features::transformer::{TRANSFORMER_FORMAT, TRANSFORMER_KIND};

        let blob = fitted().save_state().unwrap();
        let envelope: StateEnvelope = serde_json::from_slice(&blob).unwrap();
        let mut payload = envelope.payload;

        let classes = payload["encoders"][0]["classes"].as_array_mut().unwrap();
        assert!(classes.len() >= 2);
        classes.reverse();

        let resigned = StateEnvelope::wrap(TRANSFORMER_KIND, TRANSFORMER_FORMAT, &payload).unwrap();
        let tampered = serde_json::to_vec(&resigned).unwrap();
        assert!(matches!(
            FeatureTransformer::load_state(&tampered),
            Err(RiskError::CorruptState(_))
        ));

        let classes = payload["encoders"][0]["classes"].as_array_mut().unwrap();
        classes.reverse();
        let first = classes[0].clone();
        classes.insert(0, first);

        let resigned = StateEnvelope::wrap(TRANSFORMER_KIND, TRANSFORMER_FORMAT, &payload).unwrap();
        let duplicated = serde_json::to_vec(&resigned).unwrap();
        assert!(matches!(
            FeatureTransformer::load_state(&duplicated),
            Err(RiskError::CorruptState(_))
        ));
    }

    #[test]
    fn test_file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("transformer.json");

        assert!(matches!(
            FeatureTransformer::load(&path),
            Err(RiskError::StateNotFound(_))
        ));

        let transformer = fitted();
        transformer.save(&path).unwrap();
        let loaded = FeatureTransformer::load(&path).unwrap();
        assert_eq!(loaded.samples(), 3);
        assert_eq!(
            loaded.transform_one(&worst_case()).unwrap(),
            transformer.transform_one(&worst_case()).unwrap()
        );
    }
}
