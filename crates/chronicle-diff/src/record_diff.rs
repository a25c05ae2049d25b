//! Record-level diff: compare two lists of provider records by logical
//! identity.
//!
//! Records match on `(data_type, key)`. A record present only in the new
//! side is added; only in the old side, deleted; present in both with a
//! differing payload, updated (the newer payload is reported). Identical
//! payloads produce nothing, even when the surrounding file changed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chronicle_types::ProviderDatum;

/// Added/updated/deleted records within a single file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDiff {
    /// Records present only in the new side.
    pub added: Vec<ProviderDatum>,
    /// Records present in both sides with differing payloads (newer payload).
    pub updated: Vec<ProviderDatum>,
    /// Records present only in the old side.
    pub deleted: Vec<ProviderDatum>,
}

impl RecordDiff {
    /// Returns `true` if no record changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Total number of changed records.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.deleted.len()
    }
}

/// Compute the record diff between two sides of one file.
///
/// Output order is deterministic: added and updated follow the new side's
/// order, deleted follows the old side's order.
pub fn diff_records(old: &[ProviderDatum], new: &[ProviderDatum]) -> RecordDiff {
    let old_by_identity: BTreeMap<(&str, &str), &ProviderDatum> =
        old.iter().map(|d| (d.identity(), d)).collect();
    let new_by_identity: BTreeMap<(&str, &str), &ProviderDatum> =
        new.iter().map(|d| (d.identity(), d)).collect();

    let mut diff = RecordDiff::default();

    for datum in new {
        match old_by_identity.get(&datum.identity()) {
            None => diff.added.push(datum.clone()),
            Some(old_datum) if old_datum.payload != datum.payload => {
                diff.updated.push(datum.clone());
            }
            Some(_) => {}
        }
    }

    for datum in old {
        if !new_by_identity.contains_key(&datum.identity()) {
            diff.deleted.push(datum.clone());
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(key: &str, name: &str) -> ProviderDatum {
        ProviderDatum::new("track", key, json!({ "name": name }))
    }

    #[test]
    fn identical_lists_are_empty() {
        let records = vec![track("1", "X"), track("2", "Y")];
        let diff = diff_records(&records, &records);
        assert!(diff.is_empty());
    }

    #[test]
    fn payload_change_is_updated_not_delete_add() {
        let old = vec![track("1", "X")];
        let new = vec![track("1", "Y")];
        let diff = diff_records(&old, &new);
        assert_eq!(diff.updated, vec![track("1", "Y")]);
        assert!(diff.added.is_empty());
        assert!(diff.deleted.is_empty());
    }

    #[test]
    fn new_record_is_added() {
        let old = vec![track("1", "X")];
        let new = vec![track("1", "X"), track("2", "Y")];
        let diff = diff_records(&old, &new);
        assert_eq!(diff.added, vec![track("2", "Y")]);
        assert!(diff.updated.is_empty());
        assert!(diff.deleted.is_empty());
    }

    #[test]
    fn missing_record_is_deleted() {
        let old = vec![track("1", "X"), track("2", "Y")];
        let new = vec![track("1", "X")];
        let diff = diff_records(&old, &new);
        assert_eq!(diff.deleted, vec![track("2", "Y")]);
    }

    #[test]
    fn same_key_different_type_does_not_match() {
        let old = vec![ProviderDatum::new("track", "1", json!({ "n": 1 }))];
        let new = vec![ProviderDatum::new("playlist", "1", json!({ "n": 1 }))];
        let diff = diff_records(&old, &new);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.deleted.len(), 1);
        assert!(diff.updated.is_empty());
    }

    #[test]
    fn unrelated_change_leaves_other_records_out() {
        // Only track 2 changed; track 1 must not appear anywhere.
        let old = vec![track("1", "same"), track("2", "before")];
        let new = vec![track("1", "same"), track("2", "after")];
        let diff = diff_records(&old, &new);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.updated[0].key, "2");
    }

    #[test]
    fn direction_symmetry() {
        let a = vec![track("1", "X"), track("2", "Y")];
        let b = vec![track("2", "Y2"), track("3", "Z")];

        let forward = diff_records(&a, &b);
        let backward = diff_records(&b, &a);

        assert_eq!(forward.added.len(), backward.deleted.len());
        assert_eq!(forward.deleted.len(), backward.added.len());
        assert_eq!(forward.updated.len(), backward.updated.len());
    }

    #[test]
    fn order_follows_input_sides() {
        let old = vec![track("b", "old-b"), track("a", "old-a")];
        let new = vec![track("z", "new-z"), track("c", "new-c")];
        let diff = diff_records(&old, &new);
        // Added in new-side order, deleted in old-side order.
        assert_eq!(diff.added[0].key, "z");
        assert_eq!(diff.added[1].key, "c");
        assert_eq!(diff.deleted[0].key, "b");
        assert_eq!(diff.deleted[1].key, "a");
    }
}
