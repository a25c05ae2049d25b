//! Generic content diff for files that are not record lists.
//!
//! Uses the `similar` crate (Myers algorithm) to produce hunks with context
//! lines. Non-UTF-8 content falls back to a synthetic binary marker.

use similar::{ChangeTag, TextDiff};

/// The result of diffing two non-record files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentDiff {
    /// The diff hunks.
    pub hunks: Vec<ContentHunk>,
}

impl ContentDiff {
    /// Returns `true` if the two sides are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, ContentLine::Added(_)))
            .count()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, ContentLine::Removed(_)))
            .count()
    }
}

/// A contiguous region of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentHunk {
    /// Line number in the old content where this hunk starts (1-based).
    pub old_start: usize,
    /// Line number in the new content where this hunk starts (1-based).
    pub new_start: usize,
    /// The individual diff lines in this hunk.
    pub lines: Vec<ContentLine>,
}

/// A single line in a diff hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentLine {
    /// Present in both sides (context).
    Context(String),
    /// Added in the new content.
    Added(String),
    /// Removed from the old content.
    Removed(String),
}

/// Compute a line-by-line diff between two byte slices.
pub fn diff_content(old: &[u8], new: &[u8]) -> ContentDiff {
    let (old_str, new_str) = match (std::str::from_utf8(old), std::str::from_utf8(new)) {
        (Ok(o), Ok(n)) => (o, n),
        _ => return binary_diff(old, new),
    };

    if old_str == new_str {
        return ContentDiff { hunks: Vec::new() };
    }

    let text_diff = TextDiff::from_lines(old_str, new_str);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(3) {
        let Some(first_op) = group.first() else {
            continue;
        };
        let old_start = first_op.old_range().start + 1;
        let new_start = first_op.new_range().start + 1;

        let mut lines = Vec::new();
        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                lines.push(match change.tag() {
                    ChangeTag::Equal => ContentLine::Context(text),
                    ChangeTag::Delete => ContentLine::Removed(text),
                    ChangeTag::Insert => ContentLine::Added(text),
                });
            }
        }

        hunks.push(ContentHunk {
            old_start,
            new_start,
            lines,
        });
    }

    ContentDiff { hunks }
}

/// Synthetic diff for binary content.
fn binary_diff(old: &[u8], new: &[u8]) -> ContentDiff {
    let mut lines = Vec::new();
    if !old.is_empty() {
        lines.push(ContentLine::Removed(format!(
            "(binary content, {} bytes)",
            old.len()
        )));
    }
    if !new.is_empty() {
        lines.push(ContentLine::Added(format!(
            "(binary content, {} bytes)",
            new.len()
        )));
    }

    ContentDiff {
        hunks: vec![ContentHunk {
            old_start: 1,
            new_start: 1,
            lines,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_no_diff() {
        let content = b"hello\nworld\n";
        let diff = diff_content(content, content);
        assert!(diff.is_empty());
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn single_line_addition() {
        let diff = diff_content(b"line1\nline2\n", b"line1\nline2\nline3\n");
        assert!(!diff.is_empty());
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn modification_shows_remove_and_add() {
        let diff = diff_content(b"hello world\n", b"hello universe\n");
        assert!(diff.additions() >= 1);
        assert!(diff.deletions() >= 1);
    }

    #[test]
    fn empty_to_content() {
        let diff = diff_content(b"", b"new content\n");
        assert!(diff.additions() >= 1);
    }

    #[test]
    fn binary_content_fallback() {
        let diff = diff_content(&[0u8, 1, 0xFF, 0xFE], &[4u8, 0xFF, 0xFE, 0xFD]);
        assert!(!diff.is_empty());
        assert_eq!(diff.hunks.len(), 1);
    }

    #[test]
    fn context_lines_present() {
        let old = b"a\nb\nc\nd\ne\nf\ng\nh\n";
        let new = b"a\nb\nc\nd\nX\nf\ng\nh\n";
        let diff = diff_content(old, new);
        let has_context = diff.hunks[0]
            .lines
            .iter()
            .any(|l| matches!(l, ContentLine::Context(_)));
        assert!(has_context, "hunk should contain context lines");
    }

    #[test]
    fn hunk_starts_are_one_based() {
        let diff = diff_content(b"a\nb\nc\n", b"a\nB\nc\n");
        assert!(diff.hunks[0].old_start >= 1);
        assert!(diff.hunks[0].new_start >= 1);
    }
}
