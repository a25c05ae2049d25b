//! Provider contract and acquisition lifecycle for chronicle.
//!
//! A provider is one external data source (a streaming service, a social
//! network, a local export directory). Each one implements the four-step
//! [`Provider`] contract: verify a session, dispatch an export request,
//! poll until the export is ready, parse the result into provider files.
//!
//! The [`AcquisitionEngine`] drives those steps through an explicit state
//! machine, persisting every transition so a long-pending export (providers
//! can take days to prepare one) survives process restarts, and supporting
//! cancellation back to idle at any point.

pub mod directory;
pub mod engine;
pub mod error;
pub mod provider;
pub mod state;

pub use directory::DirectoryProvider;
pub use engine::{AcquisitionEngine, AcquisitionOutcome, CancelHandle, PollConfig};
pub use error::{ProviderError, ProviderResult};
pub use provider::{Provider, Session};
pub use state::{AcquisitionState, FileLifecycleStore, InMemoryLifecycleStore, LifecycleState, LifecycleStore};
