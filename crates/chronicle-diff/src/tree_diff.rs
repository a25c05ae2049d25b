//! Tree-level diff: a synchronized walk over two snapshots by file path.
//!
//! The walk merges the sorted path sets of both sides. Paths on one side
//! only become whole-file additions or deletions; paths on both sides with
//! the same blob id are skipped without touching blob content; everything
//! else goes through the comparator selected by the entry's kind.

use tracing::warn;

use chronicle_store::{EntryKind, ObjectStore, Tree, TreeEntry};
use chronicle_types::{ObjectId, ProviderDatum};

use crate::content_diff::diff_content;
use crate::error::DiffResult;
use crate::file_diff::{FileDiff, FileDiffPayload};
use crate::record_diff::diff_records;

/// Compare two trees read from the store.
///
/// `old` may be `None` for the empty tree (diffing the first commit).
pub fn diff_trees(
    store: &dyn ObjectStore,
    old: Option<&ObjectId>,
    new: &ObjectId,
) -> DiffResult<Vec<FileDiff>> {
    let old_tree = match old {
        Some(id) => store.read_tree(id)?,
        None => Tree::empty(),
    };
    let new_tree = store.read_tree(new)?;
    diff_entries(store, &old_tree.entries, &new_tree.entries)
}

/// Compare two snapshots given as sorted entry slices.
///
/// Taking entries rather than tree ids is what lets a staged, not-yet-stored
/// snapshot be diffed exactly like a committed one: blob content is fetched
/// through `store`, which may be an overlay that resolves pending blobs from
/// memory.
pub fn diff_entries(
    store: &dyn ObjectStore,
    old: &[TreeEntry],
    new: &[TreeEntry],
) -> DiffResult<Vec<FileDiff>> {
    let mut diffs = Vec::new();
    let mut old_iter = old.iter().peekable();
    let mut new_iter = new.iter().peekable();

    // Synchronized walk over the sorted union of both path sets. Paths are
    // independent, so each step only looks at the current pair.
    loop {
        let diff = match (old_iter.peek(), new_iter.peek()) {
            (None, None) => break,
            (Some(_), None) => {
                let entry = old_iter.next().expect("peeked");
                diff_one(store, Some(entry), None)?
            }
            (None, Some(_)) => {
                let entry = new_iter.next().expect("peeked");
                diff_one(store, None, Some(entry))?
            }
            (Some(o), Some(n)) => match o.path.cmp(&n.path) {
                std::cmp::Ordering::Less => {
                    let entry = old_iter.next().expect("peeked");
                    diff_one(store, Some(entry), None)?
                }
                std::cmp::Ordering::Greater => {
                    let entry = new_iter.next().expect("peeked");
                    diff_one(store, None, Some(entry))?
                }
                std::cmp::Ordering::Equal => {
                    let old_entry = old_iter.next().expect("peeked");
                    let new_entry = new_iter.next().expect("peeked");
                    if old_entry.object_id == new_entry.object_id {
                        // Byte-identical: no result at all for this path.
                        None
                    } else {
                        diff_one(store, Some(old_entry), Some(new_entry))?
                    }
                }
            },
        };

        if let Some(diff) = diff {
            if diff.has_changes() {
                diffs.push(diff);
            }
        }
    }

    Ok(diffs)
}

/// Diff a single path. At least one side must be present.
fn diff_one(
    store: &dyn ObjectStore,
    old: Option<&TreeEntry>,
    new: Option<&TreeEntry>,
) -> DiffResult<Option<FileDiff>> {
    let newer = new.or(old).expect("at least one side present");
    // The newer side's classification wins; for deletions only the old side
    // exists.
    let kind = newer.kind;
    let filepath = newer.path.clone();
    let oid = newer.object_id;

    let old_bytes = match old {
        Some(entry) => store.read_blob(&entry.object_id)?.data,
        None => Vec::new(),
    };
    let new_bytes = match new {
        Some(entry) => store.read_blob(&entry.object_id)?.data,
        None => Vec::new(),
    };

    let payload = match kind {
        EntryKind::ExtractedData => {
            let (Some(old_records), Some(new_records)) = (
                parse_records(&filepath, &old_bytes),
                parse_records(&filepath, &new_bytes),
            ) else {
                // Undecodable side: skip this file, the rest of the diff
                // stands.
                return Ok(None);
            };
            FileDiffPayload::Records(diff_records(&old_records, &new_records))
        }
        EntryKind::Other => FileDiffPayload::Content(diff_content(&old_bytes, &new_bytes)),
    };

    Ok(Some(FileDiff {
        filepath,
        oid,
        payload,
    }))
}

/// Parse one side of an extracted-data file. An absent or empty side is the
/// empty record list; an unparseable side is reported as a warning and
/// yields `None`.
fn parse_records(filepath: &str, bytes: &[u8]) -> Option<Vec<ProviderDatum>> {
    if bytes.is_empty() {
        return Some(Vec::new());
    }
    match serde_json::from_slice(bytes) {
        Ok(records) => Some(records),
        Err(e) => {
            warn!(filepath, error = %e, "skipping undecodable extracted-data file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_store::{Blob, InMemoryObjectStore, ObjectStore};
    use serde_json::json;

    fn store_records(
        store: &InMemoryObjectStore,
        path: &str,
        records: &[ProviderDatum],
    ) -> TreeEntry {
        let bytes = serde_json::to_vec(records).unwrap();
        let id = store.write(&Blob::new(bytes).to_stored_object()).unwrap();
        TreeEntry::new(path, id, EntryKind::ExtractedData)
    }

    fn store_text(store: &InMemoryObjectStore, path: &str, text: &str) -> TreeEntry {
        let id = store
            .write(&Blob::new(text.as_bytes().to_vec()).to_stored_object())
            .unwrap();
        TreeEntry::new(path, id, EntryKind::Other)
    }

    fn track(key: &str, name: &str) -> ProviderDatum {
        ProviderDatum::new("track", key, json!({ "name": name }))
    }

    #[test]
    fn identical_snapshots_are_empty() {
        let store = InMemoryObjectStore::new();
        let entries = vec![store_records(&store, "a.json", &[track("1", "X")])];
        let diffs = diff_entries(&store, &entries, &entries).unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn renamed_track_is_one_update() {
        let store = InMemoryObjectStore::new();
        let old = vec![store_records(&store, "a.json", &[track("1", "X")])];
        let new = vec![store_records(&store, "a.json", &[track("1", "Y")])];

        let diffs = diff_entries(&store, &old, &new).unwrap();
        assert_eq!(diffs.len(), 1);
        let records = diffs[0].records().unwrap();
        assert_eq!(records.updated, vec![track("1", "Y")]);
        assert!(records.added.is_empty());
        assert!(records.deleted.is_empty());
    }

    #[test]
    fn new_file_adds_all_records() {
        let store = InMemoryObjectStore::new();
        let playlist = ProviderDatum::new("playlist", "2", json!({}));
        let new = vec![store_records(&store, "b.json", std::slice::from_ref(&playlist))];

        let diffs = diff_entries(&store, &[], &new).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].filepath, "b.json");
        let records = diffs[0].records().unwrap();
        assert_eq!(records.added, vec![playlist]);
        assert!(records.deleted.is_empty());
    }

    #[test]
    fn deleted_file_deletes_all_records() {
        let store = InMemoryObjectStore::new();
        let old_entry = store_records(&store, "a.json", &[track("1", "X")]);
        let old_oid = old_entry.object_id;

        let diffs = diff_entries(&store, &[old_entry], &[]).unwrap();
        assert_eq!(diffs.len(), 1);
        let records = diffs[0].records().unwrap();
        assert_eq!(records.deleted, vec![track("1", "X")]);
        // Deletions carry the old side's blob id.
        assert_eq!(diffs[0].oid, old_oid);
    }

    #[test]
    fn unchanged_path_produces_no_result() {
        let store = InMemoryObjectStore::new();
        let shared = store_records(&store, "same.json", &[track("1", "X")]);
        let old = vec![shared.clone(), store_records(&store, "a.json", &[track("2", "Y")])];
        let new = vec![shared, store_records(&store, "a.json", &[track("2", "Z")])];

        let diffs = diff_entries(&store, &old, &new).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].filepath, "a.json");
    }

    #[test]
    fn oid_is_newer_side() {
        let store = InMemoryObjectStore::new();
        let old = vec![store_records(&store, "a.json", &[track("1", "X")])];
        let new = vec![store_records(&store, "a.json", &[track("1", "Y")])];
        let new_oid = new[0].object_id;

        let diffs = diff_entries(&store, &old, &new).unwrap();
        assert_eq!(diffs[0].oid, new_oid);
    }

    #[test]
    fn other_files_get_content_diff() {
        let store = InMemoryObjectStore::new();
        let old = vec![store_text(&store, "notes.txt", "hello\n")];
        let new = vec![store_text(&store, "notes.txt", "goodbye\n")];

        let diffs = diff_entries(&store, &old, &new).unwrap();
        assert_eq!(diffs.len(), 1);
        assert!(matches!(diffs[0].payload, FileDiffPayload::Content(_)));
    }

    #[test]
    fn undecodable_file_is_skipped_not_fatal() {
        let store = InMemoryObjectStore::new();
        let broken_id = store
            .write(&Blob::new(b"{not json".to_vec()).to_stored_object())
            .unwrap();
        let old = vec![
            store_records(&store, "good.json", &[track("1", "X")]),
        ];
        let new = vec![
            TreeEntry::new("broken.json", broken_id, EntryKind::ExtractedData),
            store_records(&store, "good.json", &[track("1", "Y")]),
        ];

        let diffs = diff_entries(&store, &old, &new).unwrap();
        // broken.json dropped, good.json still diffed.
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].filepath, "good.json");
    }

    #[test]
    fn direction_symmetry_on_trees() {
        let store = InMemoryObjectStore::new();
        let a = vec![
            store_records(&store, "a.json", &[track("1", "X")]),
            store_records(&store, "b.json", &[track("2", "Y")]),
        ];
        let b = vec![
            store_records(&store, "a.json", &[track("1", "X2")]),
            store_records(&store, "c.json", &[track("3", "Z")]),
        ];

        let forward = diff_entries(&store, &a, &b).unwrap();
        let backward = diff_entries(&store, &b, &a).unwrap();

        let count = |diffs: &[FileDiff], pick: fn(&crate::RecordDiff) -> usize| -> usize {
            diffs.iter().filter_map(|d| d.records()).map(pick).sum()
        };
        assert_eq!(count(&forward, |r| r.added.len()), count(&backward, |r| r.deleted.len()));
        assert_eq!(count(&forward, |r| r.deleted.len()), count(&backward, |r| r.added.len()));
        assert_eq!(count(&forward, |r| r.updated.len()), count(&backward, |r| r.updated.len()));
    }

    #[test]
    fn diff_trees_reads_from_store() {
        let store = InMemoryObjectStore::new();
        let old_tree = Tree::new(vec![store_records(&store, "a.json", &[track("1", "X")])]);
        let new_tree = Tree::new(vec![store_records(&store, "a.json", &[track("1", "Y")])]);
        let old_id = store.write(&old_tree.to_stored_object().unwrap()).unwrap();
        let new_id = store.write(&new_tree.to_stored_object().unwrap()).unwrap();

        let diffs = diff_trees(&store, Some(&old_id), &new_id).unwrap();
        assert_eq!(diffs.len(), 1);
    }

    #[test]
    fn diff_trees_against_empty() {
        let store = InMemoryObjectStore::new();
        let tree = Tree::new(vec![store_records(&store, "a.json", &[track("1", "X")])]);
        let id = store.write(&tree.to_stored_object().unwrap()).unwrap();

        let diffs = diff_trees(&store, None, &id).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].records().unwrap().added.len(), 1);
    }
}
