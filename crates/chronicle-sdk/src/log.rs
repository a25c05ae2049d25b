use chrono::{DateTime, Utc};

use chronicle_types::ObjectId;

/// Reference to a snapshot: a real commit or the staged pending one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitRef {
    Commit(ObjectId),
    Pending,
}

/// One row of the history listing, newest first.
///
/// The staged snapshot appears as a synthetic first entry with `pending`
/// set and no id; everything else about it reads like a real commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Commit id; `None` for the pending entry.
    pub id: Option<ObjectId>,
    pub parent: Option<ObjectId>,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub provider: String,
    pub pending: bool,
}

impl LogEntry {
    /// The ref to pass to `diff` for this entry.
    pub fn commit_ref(&self) -> CommitRef {
        match self.id {
            Some(id) => CommitRef::Commit(id),
            None => CommitRef::Pending,
        }
    }
}
