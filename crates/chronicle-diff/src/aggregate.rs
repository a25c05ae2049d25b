//! Whole-tree aggregation of per-file record diffs.
//!
//! Flattens every extracted-data file diff into one added/updated/deleted
//! view and sorts each list by record type for stable presentation. This is
//! a pure function: the same input always yields the same aggregate.

use serde::{Deserialize, Serialize};

use chronicle_types::ProviderDatum;

use crate::file_diff::FileDiff;

/// Aggregated added/updated/deleted record sets across a whole tree
/// comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDataDiff {
    /// All added records, sorted by `data_type`.
    pub added: Vec<ProviderDatum>,
    /// All updated records, sorted by `data_type`.
    pub updated: Vec<ProviderDatum>,
    /// All deleted records, sorted by `data_type`.
    pub deleted: Vec<ProviderDatum>,
}

impl ExtractedDataDiff {
    /// Returns `true` if no record changed anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Total number of changed records.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.deleted.len()
    }
}

/// Aggregate per-file diffs into a whole-tree record view.
///
/// Content diffs are ignored; only extracted-data payloads contribute. Each
/// list is stable-sorted by `data_type` ascending, so records of the same
/// type keep their flatten order (file walk order, then in-file order).
pub fn aggregate(diffs: &[FileDiff]) -> ExtractedDataDiff {
    let mut result = ExtractedDataDiff::default();

    for diff in diffs {
        if let Some(records) = diff.records() {
            result.added.extend(records.added.iter().cloned());
            result.updated.extend(records.updated.iter().cloned());
            result.deleted.extend(records.deleted.iter().cloned());
        }
    }

    result.added.sort_by(|a, b| a.data_type.cmp(&b.data_type));
    result.updated.sort_by(|a, b| a.data_type.cmp(&b.data_type));
    result.deleted.sort_by(|a, b| a.data_type.cmp(&b.data_type));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_diff::FileDiffPayload;
    use crate::record_diff::RecordDiff;
    use chronicle_types::ObjectId;
    use serde_json::json;

    fn datum(data_type: &str, key: &str) -> ProviderDatum {
        ProviderDatum::new(data_type, key, json!({ "key": key }))
    }

    fn file_diff(path: &str, records: RecordDiff) -> FileDiff {
        FileDiff {
            filepath: path.into(),
            oid: ObjectId::from_bytes(path.as_bytes()),
            payload: FileDiffPayload::Records(records),
        }
    }

    #[test]
    fn empty_input_is_empty() {
        let agg = aggregate(&[]);
        assert!(agg.is_empty());
        assert_eq!(agg.len(), 0);
    }

    #[test]
    fn flattens_across_files() {
        let diffs = vec![
            file_diff(
                "a.json",
                RecordDiff {
                    added: vec![datum("track", "1")],
                    ..Default::default()
                },
            ),
            file_diff(
                "b.json",
                RecordDiff {
                    added: vec![datum("playlist", "2")],
                    deleted: vec![datum("follower", "3")],
                    ..Default::default()
                },
            ),
        ];

        let agg = aggregate(&diffs);
        assert_eq!(agg.added.len(), 2);
        assert_eq!(agg.deleted.len(), 1);
        assert!(agg.updated.is_empty());
    }

    #[test]
    fn sorted_by_data_type() {
        let diffs = vec![file_diff(
            "a.json",
            RecordDiff {
                added: vec![datum("track", "1"), datum("album", "2"), datum("playlist", "3")],
                ..Default::default()
            },
        )];

        let agg = aggregate(&diffs);
        let types: Vec<&str> = agg.added.iter().map(|d| d.data_type.as_str()).collect();
        assert_eq!(types, vec!["album", "playlist", "track"]);
    }

    #[test]
    fn sort_is_stable_within_type() {
        // Two files both contribute "track" records; flatten order must
        // survive the sort.
        let diffs = vec![
            file_diff(
                "a.json",
                RecordDiff {
                    added: vec![datum("track", "first"), datum("zz", "x")],
                    ..Default::default()
                },
            ),
            file_diff(
                "b.json",
                RecordDiff {
                    added: vec![datum("track", "second")],
                    ..Default::default()
                },
            ),
        ];

        let agg = aggregate(&diffs);
        let track_keys: Vec<&str> = agg
            .added
            .iter()
            .filter(|d| d.data_type == "track")
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(track_keys, vec!["first", "second"]);
    }

    #[test]
    fn repeated_calls_agree() {
        let diffs = vec![file_diff(
            "a.json",
            RecordDiff {
                updated: vec![datum("b", "1"), datum("a", "2")],
                ..Default::default()
            },
        )];
        assert_eq!(aggregate(&diffs), aggregate(&diffs));
    }

    #[test]
    fn content_diffs_do_not_contribute() {
        let diffs = vec![FileDiff {
            filepath: "notes.txt".into(),
            oid: ObjectId::from_bytes(b"n"),
            payload: FileDiffPayload::Content(crate::diff_content(b"a\n", b"b\n")),
        }];
        assert!(aggregate(&diffs).is_empty());
    }
}
