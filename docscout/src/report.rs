/// Reporting of search progress and outcomes.
///
/// The coordinator never calls logging macros for per-file outcomes directly;
/// it hands every event to a [`Reporter`] that was injected when the
/// [`Searcher`](crate::search::Searcher) was built. All reporter calls happen
/// on the thread that called `run`, so implementations see events one at a
/// time even though documents are processed in parallel.
///
/// | Event                        | [`TracingReporter`] level |
/// |------------------------------|---------------------------|
/// | target found in a document   | `INFO`                    |
/// | target not found             | `DEBUG`                   |
/// | document could not be read   | `ERROR`                   |
/// | directory could not be read  | `ERROR`                   |
/// | run finished (with timing)   | `INFO`                    |
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, error, info};

use crate::config::SearchConfig;
use crate::errors::SearchError;
use crate::results::{FileOutcome, SearchResult};

/// Receives the events of a search run
pub trait Reporter: Send + Sync {
    /// Called once enumeration has produced the candidate list
    fn search_started(&self, _config: &SearchConfig, _candidates: usize) {}

    /// Called when a root or subdirectory could not be listed
    fn directory_skipped(&self, path: &Path, error: &SearchError);

    /// Called exactly once per dispatched document
    fn file_completed(&self, target: &str, outcome: &FileOutcome);

    /// Called once with the final aggregate
    fn search_finished(&self, result: &SearchResult);
}

/// Emits one `tracing` record per event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn search_started(&self, config: &SearchConfig, candidates: usize) {
        debug!(
            target_word = %config.target,
            candidates,
            threads = config.thread_count.get(),
            "Searching {} candidate documents",
            candidates
        );
    }

    fn directory_skipped(&self, path: &Path, err: &SearchError) {
        error!(path = %path.display(), "Skipping directory: {}", err);
    }

    fn file_completed(&self, target: &str, outcome: &FileOutcome) {
        let path = &outcome.path;
        match &outcome.error {
            Some(err) => error!(path = %path.display(), "Error processing {}: {}", path.display(), err),
            None if outcome.matched => {
                info!(path = %path.display(), "'{}' found in {}", target, path.display())
            }
            None => debug!(path = %path.display(), "'{}' not found in {}", target, path.display()),
        }
    }

    fn search_finished(&self, result: &SearchResult) {
        info!(
            matched = result.files_with_matches(),
            searched = result.files_searched,
            failed = result.files_failed,
            cancelled = result.cancelled,
            "Execution time: {}",
            humantime::format_duration(result.elapsed)
        );
    }
}

/// Drives a progress bar while forwarding every event to another reporter
pub struct ProgressReporter<R: Reporter> {
    inner: R,
    bar: ProgressBar,
}

impl<R: Reporter> ProgressReporter<R> {
    pub fn new(inner: R) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} documents ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { inner, bar }
    }

    /// Wraps `inner` with a bar that draws nowhere, for tests
    pub fn hidden(inner: R) -> Self {
        Self {
            inner,
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl<R: Reporter> Reporter for ProgressReporter<R> {
    fn search_started(&self, config: &SearchConfig, candidates: usize) {
        self.bar.set_length(candidates as u64);
        self.inner.search_started(config, candidates);
    }

    fn directory_skipped(&self, path: &Path, err: &SearchError) {
        self.bar
            .suspend(|| self.inner.directory_skipped(path, err));
    }

    fn file_completed(&self, target: &str, outcome: &FileOutcome) {
        self.bar.suspend(|| self.inner.file_completed(target, outcome));
        self.bar.inc(1);
    }

    fn search_finished(&self, result: &SearchResult) {
        self.bar.finish_and_clear();
        self.inner.search_finished(result);
    }
}
