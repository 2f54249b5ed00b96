//! Persisted State Envelope
//!
//! Every fitted component is stored as one JSON envelope:
//! `{ kind, format_version, created_at, checksum, payload }`.
//! The checksum is SHA-256 (hex) over the serialized payload, so a blob
//! edited by hand or truncated on disk is rejected on load.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::error::{RiskError, RiskResult};

/// On-disk wrapper around a component's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEnvelope {
    pub kind: String,
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub checksum: String,
    pub payload: serde_json::Value,
}

impl StateEnvelope {
    /// Wrap a serializable state
    pub fn wrap<T: Serialize + ?Sized>(kind: &str, format_version: u32, state: &T) -> RiskResult<Self> {
        let payload = serde_json::to_value(state)?;
        Ok(Self {
            kind: kind.to_string(),
            format_version,
            created_at: Utc::now(),
            checksum: checksum(&payload)?,
            payload,
        })
    }

    /// Verify kind, version and checksum, then decode the payload
    pub fn unwrap_state<T: DeserializeOwned>(self, kind: &str, format_version: u32) -> RiskResult<T> {
        if self.kind != kind {
            return Err(RiskError::CorruptState(format!(
                "expected a '{}' blob, found '{}'",
                kind, self.kind
            )));
        }
        if self.format_version != format_version {
            return Err(RiskError::CorruptState(format!(
                "{} format v{} is not readable by v{}",
                kind, self.format_version, format_version
            )));
        }
        if checksum(&self.payload)? != self.checksum {
            return Err(RiskError::CorruptState(format!("{} checksum mismatch", kind)));
        }

        serde_json::from_value(self.payload)
            .map_err(|e| RiskError::CorruptState(format!("{} payload: {}", kind, e)))
    }
}

fn checksum(payload: &serde_json::Value) -> RiskResult<String> {
    let bytes = serde_json::to_vec(payload)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

// ============================================================================
// BLOBS
// ============================================================================

/// Serialize a state into an opaque blob
pub fn encode_blob<T: Serialize + ?Sized>(kind: &str, format_version: u32, state: &T) -> RiskResult<Vec<u8>> {
    let envelope = StateEnvelope::wrap(kind, format_version, state)?;
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// Decode a blob produced by `encode_blob`. Unparsable bytes are corrupt state.
pub fn decode_blob<T: DeserializeOwned>(kind: &str, format_version: u32, blob: &[u8]) -> RiskResult<T> {
    let envelope: StateEnvelope = serde_json::from_slice(blob)
        .map_err(|e| RiskError::CorruptState(format!("{} envelope: {}", kind, e)))?;
    envelope.unwrap_state(kind, format_version)
}

// ============================================================================
// FILES
// ============================================================================

/// Write a blob, creating parent directories
pub fn write_blob(path: &Path, blob: &[u8]) -> RiskResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, blob)?;
    log::info!("Saved state to {}", path.display());
    Ok(())
}

/// Read a blob; a missing file is `StateNotFound`
pub fn read_blob(path: &Path) -> RiskResult<Vec<u8>> {
    if !path.exists() {
        return Err(RiskError::StateNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}
