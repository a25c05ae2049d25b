//! Head pointer storage for chronicle.
//!
//! History is a single chain with one writer, so the only mutable reference
//! is "the current head": the id of the most recent commit. This crate
//! provides the [`HeadStore`] trait and two backends:
//!
//! - [`InMemoryHeadStore`] -- for tests and embedding
//! - [`FileHeadStore`] -- a `HEAD` file in the vault directory, replaced
//!   atomically so the pointer survives crashes intact

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{RefError, RefResult};
pub use fs::FileHeadStore;
pub use memory::InMemoryHeadStore;
pub use traits::HeadStore;
