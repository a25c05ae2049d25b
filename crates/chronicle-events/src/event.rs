use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chronicle_types::ObjectId;

/// Classification of vault events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A pending snapshot was promoted into a durable commit.
    NewCommit,
    /// Freshly acquired provider data was staged.
    SnapshotStaged,
    /// The pending snapshot was discarded without promotion.
    SnapshotDiscarded,
    /// A provider acquisition moved to a new lifecycle state.
    AcquisitionStateChanged,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NewCommit => "NewCommit",
            Self::SnapshotStaged => "SnapshotStaged",
            Self::SnapshotDiscarded => "SnapshotDiscarded",
            Self::AcquisitionStateChanged => "AcquisitionStateChanged",
        };
        write!(f, "{s}")
    }
}

/// Payload data carried by a vault event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Empty payload (event kind is self-describing).
    Empty,
    /// A commit reference.
    Commit { id: ObjectId, provider: String },
    /// A provider lifecycle transition.
    Lifecycle { provider: String, state: String },
}

/// A single event flowing through the bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEvent {
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
    /// Classification kind.
    pub kind: EventKind,
    /// Event payload.
    pub payload: EventPayload,
}

impl VaultEvent {
    /// Create a new event stamped with the current time.
    pub fn new(kind: EventKind, payload: EventPayload) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            payload,
        }
    }
}
