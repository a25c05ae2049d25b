/// Errors from head pointer operations.
#[derive(Debug, thiserror::Error)]
pub enum RefError {
    /// I/O error from the underlying backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored head value could not be parsed as an object id.
    #[error("malformed head pointer: {0}")]
    Malformed(String),

    /// Backend lock was poisoned by a panicking writer.
    #[error("head store lock poisoned")]
    Poisoned,
}

/// Result alias for head pointer operations.
pub type RefResult<T> = Result<T, RefError>;
