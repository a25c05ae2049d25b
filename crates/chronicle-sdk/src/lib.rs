//! High-level vault API for chronicle.
//!
//! Ties storage, refs, diffing, staging and acquisition together behind
//! one [`Chronicle`] type. This is the entry point for applications
//! embedding a vault; the CLI is a thin wrapper around it.

pub mod error;
pub mod log;
pub mod vault;

pub use error::{SdkError, SdkResult};
pub use log::{CommitRef, LogEntry};
pub use vault::{Acquisition, Chronicle, FileChronicle, MemoryChronicle};

// Re-export key types so embedders need only this crate.
pub use chronicle_diff::{ExtractedDataDiff, FileDiff, FileDiffPayload, RecordDiff};
pub use chronicle_events::{EventFilter, EventKind, EventStream, VaultEvent};
pub use chronicle_providers::{CancelHandle, PollConfig, Provider};
pub use chronicle_types::{ObjectId, ProviderDatum, ProviderFile};
