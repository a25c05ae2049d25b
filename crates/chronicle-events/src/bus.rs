use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

use crate::event::{EventKind, EventPayload, VaultEvent};

/// Filter for subscribing to a subset of vault events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
}

impl EventFilter {
    /// Match every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match a single event kind.
    pub fn kind(kind: EventKind) -> Self {
        Self {
            kinds: Some(vec![kind]),
        }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &VaultEvent) -> bool {
        match &self.kinds {
            Some(kinds) => kinds.contains(&event.kind),
            None => true,
        }
    }
}

/// A broadcast channel receiver for vault events.
pub type EventStream = broadcast::Receiver<VaultEvent>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<VaultEvent>,
}

/// Fan-out event bus delivering events to matching subscribers.
///
/// Dropping a receiver unsubscribes implicitly: the stale subscriber is
/// pruned on the next routed event.
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
    channel_capacity: usize,
}

impl EventBus {
    /// Create a bus with the default per-subscriber channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a bus with an explicit per-subscriber channel capacity.
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            channel_capacity,
        }
    }

    /// Register a new subscriber with the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.channel_capacity);
        self.subscribers
            .write()
            .expect("bus lock poisoned")
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Emit an event to all matching subscribers.
    pub fn emit(&self, kind: EventKind, payload: EventPayload) -> VaultEvent {
        let event = VaultEvent::new(kind, payload);
        let mut subs = self.subscribers.write().expect("bus lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(&event) {
                // A failed send means every receiver is gone.
                sub.sender.send(event.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
        debug!(kind = %event.kind, "event emitted");
        event
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("bus lock poisoned").len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
