//! Per-file diff result emitted by the tree walk.

use chronicle_types::ObjectId;

use crate::content_diff::ContentDiff;
use crate::record_diff::RecordDiff;

/// The change payload for one file, shaped by the file's entry kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FileDiffPayload {
    /// Structured record changes (extracted-data files).
    Records(RecordDiff),
    /// Generic line-level changes (everything else).
    Content(ContentDiff),
}

/// The diff of a single file between two snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct FileDiff {
    /// Path of the file within the snapshot tree.
    pub filepath: String,
    /// Blob id of the newer side; for deletions, the (only remaining)
    /// older side's id.
    pub oid: ObjectId,
    /// The structured change.
    pub payload: FileDiffPayload,
}

impl FileDiff {
    /// Returns `true` if at least one record or line changed.
    ///
    /// The tree walk drops files where this is `false`, so downstream
    /// consumers only ever see real changes.
    pub fn has_changes(&self) -> bool {
        match &self.payload {
            FileDiffPayload::Records(records) => !records.is_empty(),
            FileDiffPayload::Content(content) => !content.is_empty(),
        }
    }

    /// The record diff, if this is an extracted-data file.
    pub fn records(&self) -> Option<&RecordDiff> {
        match &self.payload {
            FileDiffPayload::Records(records) => Some(records),
            FileDiffPayload::Content(_) => None,
        }
    }
}
