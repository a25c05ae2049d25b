use std::collections::HashMap;

use chronicle_store::{ObjectStore, StoreResult, StoredObject};
use chronicle_types::ObjectId;

use crate::pending::PendingSnapshot;

/// Object-store view that resolves a pending snapshot's blobs from memory
/// before falling back to the durable store.
///
/// This is what makes a staged snapshot indistinguishable from a real
/// commit to the diff engine: the walk fetches blob content through an
/// `ObjectStore`, and the overlay answers for ids that have not been
/// written yet.
pub struct OverlayStore<'a> {
    base: &'a dyn ObjectStore,
    pending: &'a HashMap<ObjectId, StoredObject>,
}

impl<'a> OverlayStore<'a> {
    pub fn new(base: &'a dyn ObjectStore, snapshot: &'a PendingSnapshot) -> Self {
        Self {
            base,
            pending: &snapshot.blobs,
        }
    }
}

impl ObjectStore for OverlayStore<'_> {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        if let Some(obj) = self.pending.get(id) {
            return Ok(Some(obj.clone()));
        }
        self.base.read(id)
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        self.base.write(object)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        if self.pending.contains_key(id) {
            return Ok(true);
        }
        self.base.exists(id)
    }
}
