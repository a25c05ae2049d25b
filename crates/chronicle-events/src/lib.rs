//! Notification channel for chronicle.
//!
//! The staging pipeline and acquisition engine publish events here;
//! presentation code subscribes to refresh its view when a new commit
//! lands. Events carry no error values: failures travel back to callers as
//! `Result`s, never across the bus.

pub mod bus;
pub mod event;

pub use bus::{EventBus, EventFilter, EventStream};
pub use event::{EventKind, EventPayload, VaultEvent};
