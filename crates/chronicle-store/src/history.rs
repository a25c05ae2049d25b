//! Commit chain traversal.

use std::collections::HashSet;

use chronicle_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::Commit;
use crate::traits::ObjectStore;

/// Walk the commit chain starting at `head`, newest first.
///
/// Returns `(id, commit)` pairs. A `None` head yields an empty history.
/// The walk is cycle-guarded; a repeated id aborts with
/// [`StoreError::CommitCycle`] rather than looping forever.
pub fn log(store: &dyn ObjectStore, head: Option<ObjectId>) -> StoreResult<Vec<(ObjectId, Commit)>> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = head;

    while let Some(id) = cursor {
        if !seen.insert(id) {
            return Err(StoreError::CommitCycle(id));
        }
        let commit = store.read_commit(&id)?;
        cursor = commit.parent;
        entries.push((id, commit));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryObjectStore;
    use crate::object::{Commit, Tree};
    use chrono::{TimeZone, Utc};

    fn write_commit(
        store: &InMemoryObjectStore,
        parent: Option<ObjectId>,
        message: &str,
        minute: u32,
    ) -> ObjectId {
        let tree = Tree::empty();
        let tree_id = store.write(&tree.to_stored_object().unwrap()).unwrap();
        let commit = Commit::new(
            parent,
            tree_id,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            message,
            "test",
        );
        store.write(&commit.to_stored_object().unwrap()).unwrap()
    }

    #[test]
    fn empty_history() {
        let store = InMemoryObjectStore::new();
        assert!(log(&store, None).unwrap().is_empty());
    }

    #[test]
    fn walks_newest_first() {
        let store = InMemoryObjectStore::new();
        let c1 = write_commit(&store, None, "first", 0);
        let c2 = write_commit(&store, Some(c1), "second", 1);
        let c3 = write_commit(&store, Some(c2), "third", 2);

        let history = log(&store, Some(c3)).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].1.message, "third");
        assert_eq!(history[1].1.message, "second");
        assert_eq!(history[2].1.message, "first");
    }

    #[test]
    fn missing_commit_surfaces_not_found() {
        let store = InMemoryObjectStore::new();
        let missing = ObjectId::from_bytes(b"missing commit");
        let err = log(&store, Some(missing)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn broken_chain_surfaces_not_found() {
        let store = InMemoryObjectStore::new();
        // Parent was never written.
        let phantom = ObjectId::from_bytes(b"phantom parent");
        let tree_id = store
            .write(&Tree::empty().to_stored_object().unwrap())
            .unwrap();
        let commit = Commit::new(
            Some(phantom),
            tree_id,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            "orphan",
            "test",
        );
        let id = store.write(&commit.to_stored_object().unwrap()).unwrap();

        let err = log(&store, Some(id)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
