use std::collections::HashMap;

use chrono::{DateTime, Utc};

use chronicle_store::{Blob, EntryKind, StoredObject, Tree, TreeEntry};
use chronicle_types::{ObjectId, ProviderDatum, ProviderFile};

/// At most one of these exists at a time: the staged, not-yet-committed
/// snapshot built from freshly acquired provider files.
///
/// The snapshot's blobs are held in memory, keyed by the content id they
/// will have once written. Nothing touches the durable store until
/// promotion, so a discarded snapshot leaves no trace.
#[derive(Clone, Debug)]
pub struct PendingSnapshot {
    /// Key of the provider whose acquisition produced this snapshot.
    pub provider: String,
    /// Commit message used on promotion.
    pub message: String,
    /// When the snapshot was staged. Also the promoted commit's
    /// timestamp, so retrying a failed promotion converges on the same
    /// commit id.
    pub staged_at: DateTime<Utc>,
    /// Full entry listing of the snapshot, sorted by path.
    pub entries: Vec<TreeEntry>,
    /// Blobs introduced by this snapshot, keyed by content id.
    pub blobs: HashMap<ObjectId, StoredObject>,
}

impl PendingSnapshot {
    /// Build a snapshot by overlaying provider files onto a base entry
    /// listing (the current head's tree).
    ///
    /// Files whose bytes decode as a record list are classified as
    /// extracted data; the classification is fixed here and travels with
    /// the tree entry, so both sides of any later comparison agree on it.
    pub fn build(
        base: &[TreeEntry],
        provider: impl Into<String>,
        message: impl Into<String>,
        files: &[ProviderFile],
    ) -> Self {
        let mut by_path: HashMap<&str, TreeEntry> = base
            .iter()
            .map(|e| (e.path.as_str(), e.clone()))
            .collect();
        let mut blobs = HashMap::new();

        for file in files {
            let stored = Blob::new(file.data.clone()).to_stored_object();
            let id = stored.compute_id();
            let kind = classify(&file.data);
            blobs.insert(id, stored);
            by_path.insert(&file.filepath, TreeEntry::new(&file.filepath, id, kind));
        }

        let entries = Tree::new(by_path.into_values().collect()).entries;
        Self {
            provider: provider.into(),
            message: message.into(),
            staged_at: Utc::now(),
            entries,
            blobs,
        }
    }

    /// The snapshot's tree, as it will be stored on promotion.
    pub fn tree(&self) -> Tree {
        Tree {
            entries: self.entries.clone(),
        }
    }
}

/// A file whose bytes decode as a list of records is diffed
/// record-by-record; everything else gets a generic content diff.
fn classify(data: &[u8]) -> EntryKind {
    if serde_json::from_slice::<Vec<ProviderDatum>>(data).is_ok() {
        EntryKind::ExtractedData
    } else {
        EntryKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_file(path: &str) -> ProviderFile {
        let records = vec![ProviderDatum::new("track", "1", json!({"name": "X"}))];
        ProviderFile::from_records(path, &records).unwrap()
    }

    #[test]
    fn record_files_classified_as_extracted_data() {
        let snapshot = PendingSnapshot::build(&[], "spotify", "import", &[record_file("a.json")]);
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].kind, EntryKind::ExtractedData);
    }

    #[test]
    fn opaque_files_classified_as_other() {
        let files = vec![ProviderFile::new("notes.txt", b"plain text".to_vec())];
        let snapshot = PendingSnapshot::build(&[], "spotify", "import", &files);
        assert_eq!(snapshot.entries[0].kind, EntryKind::Other);
    }

    #[test]
    fn overlay_replaces_base_entry() {
        let first = PendingSnapshot::build(&[], "spotify", "one", &[record_file("a.json")]);
        let second = PendingSnapshot::build(
            &first.entries,
            "spotify",
            "two",
            &[ProviderFile::from_records(
                "a.json",
                &[ProviderDatum::new("track", "1", json!({"name": "Y"}))],
            )
            .unwrap()],
        );
        assert_eq!(second.entries.len(), 1);
        assert_ne!(second.entries[0].object_id, first.entries[0].object_id);
    }

    #[test]
    fn overlay_keeps_unrelated_base_entries() {
        let base = PendingSnapshot::build(&[], "spotify", "one", &[record_file("spotify/a.json")]);
        let next = PendingSnapshot::build(
            &base.entries,
            "github",
            "two",
            &[record_file("github/b.json")],
        );
        assert_eq!(next.entries.len(), 2);
        assert!(next.entries.iter().any(|e| e.path == "spotify/a.json"));
    }

    #[test]
    fn entries_sorted_by_path() {
        let files = vec![record_file("z.json"), record_file("a.json")];
        let snapshot = PendingSnapshot::build(&[], "spotify", "import", &files);
        assert_eq!(snapshot.entries[0].path, "a.json");
        assert_eq!(snapshot.entries[1].path, "z.json");
    }

    #[test]
    fn blobs_keyed_by_content_id() {
        let snapshot = PendingSnapshot::build(&[], "spotify", "import", &[record_file("a.json")]);
        let entry = &snapshot.entries[0];
        let stored = snapshot.blobs.get(&entry.object_id).unwrap();
        assert_eq!(stored.compute_id(), entry.object_id);
    }
}
