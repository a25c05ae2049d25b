use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use chronicle_events::{EventBus, EventKind, EventPayload};
use chronicle_refs::HeadStore;
use chronicle_store::{Commit, ObjectStore, StoredObject};
use chronicle_types::{ObjectId, ProviderFile};

use crate::error::{StagingError, StagingResult};
use crate::pending::PendingSnapshot;

/// The stage/promote/discard pipeline.
///
/// The pending-snapshot slot is a single mutable resource guarded by a
/// mutex, so a promote in progress cannot be concurrently discarded or
/// overwritten. Promotion is atomic at the head update: objects may be
/// written ahead of a failure, but the head (and therefore history) only
/// moves once everything is durable, and content addressing makes a
/// retry converge on the same commit id.
pub struct StagingPipeline<S, H> {
    store: Arc<S>,
    head: Arc<H>,
    bus: Arc<EventBus>,
    pending: Mutex<Option<PendingSnapshot>>,
}

impl<S: ObjectStore, H: HeadStore> StagingPipeline<S, H> {
    pub fn new(store: Arc<S>, head: Arc<H>, bus: Arc<EventBus>) -> Self {
        Self {
            store,
            head,
            bus,
            pending: Mutex::new(None),
        }
    }

    /// Stage a new pending snapshot built from provider files overlaid
    /// onto the current head's tree.
    ///
    /// Replaces any previously staged snapshot without promoting it.
    pub fn stage(
        &self,
        provider: &str,
        message: &str,
        files: &[ProviderFile],
    ) -> StagingResult<PendingSnapshot> {
        // Lock held across the base-tree read so a concurrent promote
        // cannot move the head under the snapshot being built.
        let mut slot = self.pending.lock().expect("staging lock poisoned");
        let base = match self.head.head()? {
            Some(head_id) => {
                let commit = self.store.read_commit(&head_id)?;
                self.store.read_tree(&commit.tree)?.entries
            }
            None => Vec::new(),
        };
        let snapshot = PendingSnapshot::build(&base, provider, message, files);
        let replaced = slot.replace(snapshot.clone()).is_some();
        drop(slot);

        debug!(provider, files = files.len(), replaced, "snapshot staged");
        self.bus.emit(EventKind::SnapshotStaged, EventPayload::Empty);
        Ok(snapshot)
    }

    /// A clone of the currently staged snapshot, if any.
    pub fn pending(&self) -> Option<PendingSnapshot> {
        self.pending.lock().expect("staging lock poisoned").clone()
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .expect("staging lock poisoned")
            .is_some()
    }

    /// Promote the pending snapshot into a durable commit.
    ///
    /// On success the slot is cleared and a new-commit event is emitted.
    /// On failure the slot is left untouched so the caller can retry;
    /// the head is never moved on a failed promotion.
    pub fn promote(&self) -> StagingResult<ObjectId> {
        let mut slot = self.pending.lock().expect("staging lock poisoned");
        let snapshot = slot.as_ref().ok_or(StagingError::NothingStaged)?;

        let blobs: Vec<StoredObject> = snapshot.blobs.values().cloned().collect();
        self.store.write_batch(&blobs)?;

        let tree_id = self.store.write(&snapshot.tree().to_stored_object()?)?;
        let parent = self.head.head()?;
        let commit = Commit::new(
            parent,
            tree_id,
            snapshot.staged_at,
            snapshot.message.clone(),
            snapshot.provider.clone(),
        );
        let commit_id = self.store.write(&commit.to_stored_object()?)?;
        self.head.set_head(commit_id)?;

        let provider = snapshot.provider.clone();
        *slot = None;
        drop(slot);

        info!(commit = %commit_id.short_hex(), provider, "snapshot promoted");
        self.bus.emit(
            EventKind::NewCommit,
            EventPayload::Commit {
                id: commit_id,
                provider,
            },
        );
        Ok(commit_id)
    }

    /// Discard the pending snapshot without writing anything.
    pub fn discard(&self) -> StagingResult<()> {
        let mut slot = self.pending.lock().expect("staging lock poisoned");
        if slot.take().is_none() {
            return Err(StagingError::NothingStaged);
        }
        drop(slot);

        debug!("pending snapshot discarded");
        self.bus
            .emit(EventKind::SnapshotDiscarded, EventPayload::Empty);
        Ok(())
    }
}
