use std::path::Path;
use tracing::trace;

use crate::document::{DocumentReader, DocxReader};
use crate::report::{Reporter, TracingReporter};
use crate::results::FileOutcome;

/// Tests documents for a target substring
#[derive(Debug, Clone, Default)]
pub struct ContentMatcher<R = DocxReader> {
    reader: R,
}

impl ContentMatcher<DocxReader> {
    pub fn new() -> Self {
        Self::with_reader(DocxReader::new())
    }
}

impl<R: DocumentReader> ContentMatcher<R> {
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Inspects one document without logging anything.
    ///
    /// Read failures are folded into the outcome; they never reach the caller
    /// as an error.
    pub fn inspect(&self, path: &Path, target: &str) -> FileOutcome {
        trace!("Inspecting: {}", path.display());
        match self.reader.paragraphs(path) {
            Ok(paragraphs) if paragraphs.iter().any(|p| p.contains(target)) => {
                FileOutcome::matched(path)
            }
            Ok(_) => FileOutcome::not_matched(path),
            Err(err) => FileOutcome::failed(path, &err),
        }
    }

    /// Returns whether any paragraph contains `target`, logging exactly one
    /// record for the outcome. Unreadable documents count as not found.
    pub fn matches(&self, path: &Path, target: &str) -> bool {
        let outcome = self.inspect(path, target);
        TracingReporter.file_completed(target, &outcome);
        outcome.matched
    }
}
