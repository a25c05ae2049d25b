//! Diff engine for chronicle.
//!
//! Computes structured, type-aware differences between two snapshots of a
//! person's provider data. The comparison is not a byte diff: extracted-data
//! files are deserialized into records and matched by logical identity, so a
//! renamed playlist shows up as one updated record instead of a delete/add
//! pair.
//!
//! # Key Types
//!
//! - [`FileDiff`] / [`FileDiffPayload`] -- per-file change, record-level or
//!   generic content
//! - [`RecordDiff`] -- added/updated/deleted records within one file
//! - [`ContentDiff`] / [`ContentHunk`] / [`ContentLine`] -- line-level diff
//!   for non-record files
//! - [`ExtractedDataDiff`] -- whole-tree aggregate, sorted by record type

pub mod aggregate;
pub mod content_diff;
pub mod error;
pub mod file_diff;
pub mod record_diff;
pub mod tree_diff;

pub use aggregate::{aggregate, ExtractedDataDiff};
pub use content_diff::{diff_content, ContentDiff, ContentHunk, ContentLine};
pub use error::{DiffError, DiffResult};
pub use file_diff::{FileDiff, FileDiffPayload};
pub use record_diff::{diff_records, RecordDiff};
pub use tree_diff::{diff_entries, diff_trees};
