//! Error types for the diff crate.

/// Errors that can occur during diff operations.
///
/// A missing or corrupt object during the walk surfaces as the underlying
/// store error; the walk itself is total over its inputs.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] chronicle_store::StoreError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
