//! Content-addressed object storage for chronicle.
//!
//! Every snapshot of a person's provider data is stored as immutable objects
//! keyed by their BLAKE3 hash (domain-separated by object kind), analogous to
//! git's `.git/objects/` directory.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw contents of one provider file
//! - [`Tree`] -- flat mapping of file paths to object references
//! - [`Commit`] -- a timestamped snapshot with a single parent, forming
//!   linear history
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileObjectStore`] -- loose objects on disk, one file per object
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes are idempotent: identical content returns the existing id.
//! 3. Concurrent reads are always safe (objects are immutable).
//! 4. Reads verify the content hash; corruption is surfaced, never masked.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod hasher;
pub mod history;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FileObjectStore;
pub use hasher::ContentHasher;
pub use history::log;
pub use memory::InMemoryObjectStore;
pub use object::{
    Blob, Commit, EntryKind, ObjectKind, StoredObject, Tree, TreeEntry,
};
pub use traits::ObjectStore;
