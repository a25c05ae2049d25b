use thiserror::Error;

use chronicle_refs::RefError;
use chronicle_store::StoreError;

/// Errors raised by the staging pipeline.
#[derive(Debug, Error)]
pub enum StagingError {
    /// An operation required a pending snapshot but none is staged.
    #[error("nothing staged")]
    NothingStaged,

    /// Object store failure. During `promote` this means the commit was
    /// not created; the pending snapshot is retained for retry.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Head pointer failure. The head is only moved after all objects
    /// are durably written, so a failure here also leaves the pending
    /// snapshot intact.
    #[error(transparent)]
    Ref(#[from] RefError),
}

pub type StagingResult<T> = Result<T, StagingError>;
