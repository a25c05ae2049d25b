use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One semantic record extracted from a provider (a playlist, a message, a
/// follower, ...).
///
/// Two data of the same `data_type` and the same `key` refer to the same
/// logical record; a payload difference between them means the record was
/// updated, not deleted and re-added. The key is assigned by the provider
/// and must be stable across exports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDatum {
    /// Provider-defined type discriminator (e.g. "track", "playlist").
    pub data_type: String,
    /// Stable logical identity within `data_type`.
    pub key: String,
    /// The record contents, opaque to the storage and diff layers.
    pub payload: Value,
}

impl ProviderDatum {
    /// Create a new datum.
    pub fn new(data_type: impl Into<String>, key: impl Into<String>, payload: Value) -> Self {
        Self {
            data_type: data_type.into(),
            key: key.into(),
            payload,
        }
    }

    /// The `(data_type, key)` identity pair used for diff matching.
    pub fn identity(&self) -> (&str, &str) {
        (&self.data_type, &self.key)
    }
}

/// A single file produced by a provider, consumed by the staging pipeline
/// as one entry of the pending snapshot's tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFile {
    /// Path of the file within the snapshot tree (e.g. "spotify/playlists.json").
    pub filepath: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl ProviderFile {
    /// Create a new provider file.
    pub fn new(filepath: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filepath: filepath.into(),
            data,
        }
    }

    /// Create a provider file holding a serialized record list.
    pub fn from_records(
        filepath: impl Into<String>,
        records: &[ProviderDatum],
    ) -> serde_json::Result<Self> {
        Ok(Self {
            filepath: filepath.into(),
            data: serde_json::to_vec(records)?,
        })
    }
}
