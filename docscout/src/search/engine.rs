use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

use super::cancel::CancellationToken;
use super::enumerator::enumerate;
use super::matcher::ContentMatcher;
use crate::config::SearchConfig;
use crate::document::{DocumentReader, DocxReader};
use crate::errors::{SearchError, SearchResult};
use crate::report::{Reporter, TracingReporter};
use crate::results::{FileOutcome, SearchResult as SearchOutput, WorkItem};

/// Runs searches over `.docx` files with the default reporter
pub fn search(config: &SearchConfig) -> SearchResult<SearchOutput> {
    Searcher::new().run(config)
}

/// Coordinates enumeration, bounded parallel matching and aggregation
pub struct Searcher<R = DocxReader> {
    matcher: ContentMatcher<R>,
    reporter: Arc<dyn Reporter>,
    cancellation: CancellationToken,
}

impl Searcher<DocxReader> {
    pub fn new() -> Self {
        Self::with_reader(DocxReader::new())
    }
}

impl Default for Searcher<DocxReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: DocumentReader> Searcher<R> {
    /// Creates a searcher that reads documents through `reader`
    pub fn with_reader(reader: R) -> Self {
        Self {
            matcher: ContentMatcher::with_reader(reader),
            reporter: Arc::new(TracingReporter),
            cancellation: CancellationToken::new(),
        }
    }

    /// Replaces the reporter that receives every outcome
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Attaches a cancellation signal held by the caller
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns a handle that cancels this searcher's runs
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Performs one search run.
    ///
    /// Fails only with [`SearchError::InvalidConfig`], before touching the
    /// filesystem. Once enumeration starts the run always completes and every
    /// dispatched document has exactly one outcome.
    pub fn run(&self, config: &SearchConfig) -> SearchResult<SearchOutput> {
        let started = Instant::now();

        debug!("Validating search configuration");
        config.validate()?;

        debug!("Enumerating {} roots", config.roots.len());
        let items = enumerate(config, self.reporter.as_ref());
        self.reporter.search_started(config, items.len());

        let mut result = SearchOutput::new();
        result.candidates = items.len();

        if !items.is_empty() {
            let mut outcomes = self.dispatch(&items, config.thread_count.get());
            outcomes.sort_unstable_by_key(|(index, _)| *index);
            for (_, outcome) in outcomes {
                result.add_outcome(outcome);
            }
        }

        result.cancelled = result.files_searched < result.candidates;
        result.elapsed = started.elapsed();
        debug!(
            "Search completed: {} of {} candidates searched",
            result.files_searched, result.candidates
        );
        self.reporter.search_finished(&result);
        Ok(result)
    }

    /// Fans items out to a pool of `threads` workers and collects
    /// `(enumeration index, outcome)` pairs in completion order
    fn dispatch(&self, items: &[WorkItem], threads: usize) -> Vec<(usize, FileOutcome)> {
        let pool = match ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("docscout-worker-{}", i))
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                warn!("Worker pool unavailable ({}), searching sequentially", err);
                return self.dispatch_sequential(items);
            }
        };

        debug!(
            "Dispatching {} documents to {} workers",
            items.len(),
            threads
        );
        let (sender, receiver) = mpsc::channel();
        let mut outcomes = Vec::with_capacity(items.len());

        thread::scope(|scope| {
            scope.spawn(|| {
                pool.install(|| {
                    items
                        .par_iter()
                        .enumerate()
                        .for_each_with(sender, |sender, (index, item)| {
                            if self.cancellation.is_cancelled() {
                                return;
                            }
                            // The receiver is drained until every sender is dropped
                            let _ = sender.send((index, self.process(item)));
                        });
                });
            });

            debug!("Awaiting outcomes");
            for (index, outcome) in receiver {
                self.reporter.file_completed(items[index].target(), &outcome);
                outcomes.push((index, outcome));
            }
        });

        outcomes
    }

    fn dispatch_sequential(&self, items: &[WorkItem]) -> Vec<(usize, FileOutcome)> {
        items
            .iter()
            .enumerate()
            .take_while(|_| !self.cancellation.is_cancelled())
            .map(|(index, item)| {
                let outcome = self.process(item);
                self.reporter.file_completed(item.target(), &outcome);
                (index, outcome)
            })
            .collect()
    }

    /// Matches one item, turning a worker panic into a failed outcome
    fn process(&self, item: &WorkItem) -> FileOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.matcher.inspect(item.path(), item.target())
        }))
        .unwrap_or_else(|payload| {
            let err = SearchError::worker_failure(item.path(), panic_message(payload.as_ref()));
            FileOutcome::failed(item.path(), &err)
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
