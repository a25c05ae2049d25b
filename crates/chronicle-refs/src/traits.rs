use chronicle_types::ObjectId;

use crate::error::RefResult;

/// Storage for the current head of the commit chain.
///
/// Implementations must be thread-safe (`Send + Sync`). `set_head` must be
/// atomic: a reader never observes a torn or half-written pointer.
pub trait HeadStore: Send + Sync {
    /// Read the current head.
    ///
    /// Returns `Ok(None)` if no commit has ever been promoted.
    fn head(&self) -> RefResult<Option<ObjectId>>;

    /// Point the head at a new commit.
    fn set_head(&self, id: ObjectId) -> RefResult<()>;
}
