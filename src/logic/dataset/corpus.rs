//! Corpus CSV codec
//!
//! Header: `device_id`, the 22 record fields in layout order, `risk_level`.
//! Booleans are written as `true`/`false`, the label as its integer value.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::FEATURE_LAYOUT;
use crate::logic::record::{LabeledRecord, RawRecord, Record, RiskLevel, DEVICE_ID_FIELD, LABEL_FIELD};

/// Full corpus header
pub fn corpus_header() -> Vec<&'static str> {
    let mut header = Vec::with_capacity(FEATURE_LAYOUT.len() + 2);
    header.push(DEVICE_ID_FIELD);
    header.extend_from_slice(FEATURE_LAYOUT);
    header.push(LABEL_FIELD);
    header
}

// ============================================================================
// WRITE
// ============================================================================

pub fn write_corpus_to<W: Write>(writer: W, corpus: &[LabeledRecord]) -> RiskResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(corpus_header())?;

    for row in corpus {
        let raw = row.record.to_raw();
        let mut fields: Vec<String> = Vec::with_capacity(FEATURE_LAYOUT.len() + 2);
        fields.push(raw.get(DEVICE_ID_FIELD).unwrap_or_default().to_string());
        for name in FEATURE_LAYOUT {
            fields.push(raw.get(name).unwrap_or_default().to_string());
        }
        fields.push(row.risk_level.value().to_string());
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write a labelled corpus, creating parent directories
pub fn write_corpus(path: &Path, corpus: &[LabeledRecord]) -> RiskResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_corpus_to(File::create(path)?, corpus)?;
    log::info!("Wrote {} corpus rows to {:?}", corpus.len(), path);
    Ok(())
}

// ============================================================================
// READ
// ============================================================================

/// Rows as untyped records keyed by header name. Blank cells are dropped,
/// so a blank required field surfaces as `MissingField` downstream.
pub fn read_raw_from<R: Read>(reader: R) -> RiskResult<Vec<RawRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| RiskError::at_row(row, e.into()))?;
        let raw: RawRecord = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| (name.trim(), value.trim()))
            .collect();
        rows.push(raw);
    }
    Ok(rows)
}

pub fn read_raw(path: &Path) -> RiskResult<Vec<RawRecord>> {
    if !path.exists() {
        return Err(RiskError::NotFound(path.display().to_string()));
    }
    read_raw_from(File::open(path)?)
}

fn labeled_from_raw(mut raw: RawRecord) -> RiskResult<LabeledRecord> {
    let label = raw.remove(LABEL_FIELD).ok_or(RiskError::MissingField(LABEL_FIELD))?;
    let value: i64 = label.trim().parse().map_err(|_| RiskError::InvalidValue {
        field: LABEL_FIELD,
        value: label.clone(),
    })?;
    let risk_level = RiskLevel::from_value(value)?;
    let record = Record::from_raw(&raw)?;
    Ok(LabeledRecord::new(record, risk_level))
}

/// Labelled corpus; every row must carry a valid `risk_level`
pub fn read_corpus_from<R: Read>(reader: R) -> RiskResult<Vec<LabeledRecord>> {
    read_raw_from(reader)?
        .into_iter()
        .enumerate()
        .map(|(row, raw)| labeled_from_raw(raw).map_err(|e| RiskError::at_row(row, e)))
        .collect()
}

pub fn read_corpus(path: &Path) -> RiskResult<Vec<LabeledRecord>> {
    if !path.exists() {
        return Err(RiskError::NotFound(path.display().to_string()));
    }
    let corpus = read_corpus_from(File::open(path)?)?;
    log::info!("Read {} corpus rows from {:?}", corpus.len(), path);
    Ok(corpus)
}
