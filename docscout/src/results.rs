/// Work items and the outcomes a search run produces from them.
///
/// A [`WorkItem`] is created by the enumerator and consumed exactly once by a
/// worker, which turns it into exactly one [`FileOutcome`]. The coordinator
/// folds outcomes into a [`SearchResult`], which is owned by the caller once
/// the run returns.
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::SearchError;

/// One document to inspect for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    path: PathBuf,
    target: Arc<str>,
}

impl WorkItem {
    pub fn new(path: impl Into<PathBuf>, target: Arc<str>) -> Self {
        Self {
            path: path.into(),
            target,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// The result of inspecting a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    /// The document that was inspected
    pub path: PathBuf,
    /// Whether any paragraph contained the target
    pub matched: bool,
    /// Why the document could not be inspected, if it could not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn matched(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            matched: true,
            error: None,
        }
    }

    pub fn not_matched(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            matched: false,
            error: None,
        }
    }

    /// A failed outcome is never a match
    pub fn failed(path: impl Into<PathBuf>, error: &SearchError) -> Self {
        Self {
            path: path.into(),
            matched: false,
            error: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Represents the complete results of one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    /// Documents containing the target, in enumeration order
    pub matched_paths: Vec<PathBuf>,
    /// One outcome per dispatched document, in enumeration order
    pub outcomes: Vec<FileOutcome>,
    /// Number of candidate documents found by the enumerator
    pub candidates: usize,
    /// Number of documents that were dispatched and produced an outcome
    pub files_searched: usize,
    /// Number of documents that could not be read
    pub files_failed: usize,
    /// Whether the run stopped dispatching before every candidate was searched
    pub cancelled: bool,
    /// Wall-clock time of the whole run
    pub elapsed: Duration,
}

impl SearchResult {
    /// Creates a new empty search result
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds one outcome to the aggregate
    pub fn add_outcome(&mut self, outcome: FileOutcome) {
        self.files_searched += 1;
        if outcome.is_failure() {
            self.files_failed += 1;
        } else if outcome.matched && !self.matched_paths.contains(&outcome.path) {
            self.matched_paths.push(outcome.path.clone());
        }
        self.outcomes.push(outcome);
    }

    /// Number of documents containing the target
    pub fn files_with_matches(&self) -> usize {
        self.matched_paths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_shares_target() {
        let target: Arc<str> = Arc::from("hirusha");
        let a = WorkItem::new("/data/a.docx", Arc::clone(&target));
        let b = WorkItem::new("/data/b.docx", Arc::clone(&target));

        assert_eq!(a.target(), "hirusha");
        assert_eq!(b.path(), Path::new("/data/b.docx"));
        assert_eq!(Arc::strong_count(&target), 3);
    }

    #[test]
    fn test_failed_outcome_is_unmatched() {
        let err = SearchError::document_unreadable("c.docx", "invalid Zip archive");
        let outcome = FileOutcome::failed("c.docx", &err);

        assert!(!outcome.matched);
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.error.as_deref(),
            Some("Cannot read document c.docx: invalid Zip archive")
        );
    }

    #[test]
    fn test_search_result_new() {
        let result = SearchResult::new();
        assert!(result.matched_paths.is_empty());
        assert!(result.outcomes.is_empty());
        assert_eq!(result.files_searched, 0);
        assert_eq!(result.files_failed, 0);
        assert!(!result.cancelled);
        assert_eq!(result.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_search_result_add_outcome() {
        let mut result = SearchResult::new();

        result.add_outcome(FileOutcome::matched("a.docx"));
        result.add_outcome(FileOutcome::not_matched("b.docx"));
        result.add_outcome(FileOutcome::failed(
            "c.docx",
            &SearchError::document_unreadable("c.docx", "bad"),
        ));

        assert_eq!(result.matched_paths, vec![PathBuf::from("a.docx")]);
        assert_eq!(result.files_searched, 3);
        assert_eq!(result.files_failed, 1);
        assert_eq!(result.files_with_matches(), 1);
        assert_eq!(result.outcomes.len(), 3);
    }

    #[test]
    fn test_matched_path_recorded_once() {
        let mut result = SearchResult::new();
        result.add_outcome(FileOutcome::matched("a.docx"));
        result.add_outcome(FileOutcome::matched("a.docx"));

        assert_eq!(result.matched_paths.len(), 1);
        assert_eq!(result.files_searched, 2);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut result = SearchResult::new();
        result.add_outcome(FileOutcome::matched("a.docx"));
        result.candidates = 1;

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["matched_paths"][0], "a.docx");
        assert_eq!(json["outcomes"][0]["matched"], true);
        assert!(json["outcomes"][0].get("error").is_none());
        assert_eq!(json["candidates"], 1);
    }
}
