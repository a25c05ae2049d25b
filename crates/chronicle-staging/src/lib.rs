//! Staging pipeline for chronicle.
//!
//! Holds at most one uncommitted pending snapshot built from freshly
//! acquired provider files, exposes it for diffing exactly like a real
//! commit, and promotes it into a durable commit atomically.
//!
//! - [`PendingSnapshot`] — the staged tree plus its not-yet-stored blobs
//! - [`OverlayStore`] — object-store view that resolves pending blobs
//!   from memory before falling back to the durable store
//! - [`StagingPipeline`] — the mutually exclusive stage/promote/discard
//!   operations

pub mod error;
pub mod overlay;
pub mod pending;
pub mod pipeline;

pub use error::{StagingError, StagingResult};
pub use overlay::OverlayStore;
pub use pending::PendingSnapshot;
pub use pipeline::StagingPipeline;
