//! Training pipeline: split → fit transformer → train classifier → validate

use std::path::Path;

use serde::Serialize;

use super::synthetic::{split_corpus, CorpusSummary};
use crate::logic::assessment::ModelBundle;
use crate::logic::config::EngineConfig;
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::FeatureTransformer;
use crate::logic::model::{RandomForest, RiskClassifier};
use crate::logic::record::{LabeledRecord, Record, RiskLevel};

/// What a training run produced, for logs and the CLI
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub train_samples: usize,
    pub validation_samples: usize,
    pub train_accuracy: Option<f64>,
    pub validation_accuracy: Option<f64>,
    pub feature_importances: Vec<(&'static str, f64)>,
    pub summary: CorpusSummary,
}

/// Share of `records` the classifier labels as `labels` does
pub fn accuracy(
    classifier: &RiskClassifier,
    records: &[Record],
    labels: &[RiskLevel],
) -> RiskResult<Option<f64>> {
    if records.len() != labels.len() {
        return Err(RiskError::LengthMismatch {
            features: records.len(),
            labels: labels.len(),
        });
    }
    if records.is_empty() {
        return Ok(None);
    }
    let predicted = classifier.predict(records)?;
    let hits = predicted.iter().zip(labels).filter(|(p, l)| p == l).count();
    Ok(Some(hits as f64 / records.len() as f64))
}

fn unzip(rows: Vec<LabeledRecord>) -> (Vec<Record>, Vec<RiskLevel>) {
    rows.into_iter().map(|row| (row.record, row.risk_level)).unzip()
}

/// Train a bundle on `corpus`. The transformer sees only the training
/// part; an unseen category in the validation part fails the run.
pub fn train_pipeline(
    corpus: &[LabeledRecord],
    config: &EngineConfig,
) -> RiskResult<(ModelBundle, TrainingReport)> {
    if corpus.is_empty() {
        return Err(RiskError::EmptyCorpus);
    }
    for (row, labeled) in corpus.iter().enumerate() {
        labeled.record.validate().map_err(|e| RiskError::at_row(row, e))?;
    }

    let summary = CorpusSummary::from_corpus(corpus);
    let (train, validation) = split_corpus(corpus, config.train_ratio, config.forest.seed)?;
    let (train_records, train_labels) = unzip(train);
    let (validation_records, validation_labels) = unzip(validation);

    log::info!(
        "Training on {} rows ({} train / {} validation)",
        corpus.len(),
        train_records.len(),
        validation_records.len()
    );

    let mut transformer = FeatureTransformer::new();
    transformer.fit(&train_records)?;
    // surfaces unseen categories before the classifier is trained
    transformer.transform(&validation_records)?;

    let mut classifier = RiskClassifier::new(RandomForest::new(config.forest.clone()));
    classifier.train(&train_records, &train_labels)?;

    let train_accuracy = accuracy(&classifier, &train_records, &train_labels)?;
    let validation_accuracy = accuracy(&classifier, &validation_records, &validation_labels)?;

    match validation_accuracy {
        Some(acc) => log::info!("Validation accuracy: {:.3}", acc),
        None => log::warn!("No validation rows; accuracy not measured"),
    }

    let report = TrainingReport {
        samples: corpus.len(),
        train_samples: train_records.len(),
        validation_samples: validation_records.len(),
        train_accuracy,
        validation_accuracy,
        feature_importances: classifier.feature_importances(),
        summary,
    };

    Ok((ModelBundle::new(transformer, classifier), report))
}

/// Train, then persist the bundle into `dir`
pub fn train_and_save(
    corpus: &[LabeledRecord],
    config: &EngineConfig,
    dir: &Path,
) -> RiskResult<TrainingReport> {
    let (bundle, report) = train_pipeline(corpus, config)?;
    bundle.save(dir)?;
    log::info!("Saved model bundle to {:?}", dir);
    Ok(report)
}
