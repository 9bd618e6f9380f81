/// This module implements the concurrent document search pipeline.
///
/// # Pipeline
///
/// ```text
/// SearchConfig ──► enumerate ──► [WorkItem] ──► rayon pool (thread_count) ──► ContentMatcher
///                                                      │
///                                   mpsc channel ◄─────┘ (index, FileOutcome)
///                                        │
///                              Reporter + SearchResult (calling thread)
/// ```
///
/// 1. **Validating**: the config is checked before any filesystem access.
/// 2. **Enumerating**: [`enumerate`] walks every root and builds the work list.
/// 3. **Dispatching**: work items are fed to a dedicated Rayon pool whose size
///    bounds how many documents are open at once.
/// 4. **Awaiting**: outcomes stream back over a single channel; the calling
///    thread reports each one and owns the aggregate, so workers never share
///    mutable state.
/// 5. **Completed**: outcomes are put back in enumeration order and returned
///    with the elapsed time.
///
/// # Error Handling
///
/// ```rust,ignore
/// match search(&config) {
///     Ok(result) => // One outcome per dispatched document,
///     Err(e) => // Invalid configuration, nothing was searched
/// }
/// ```
pub mod cancel;
pub mod engine;
pub mod enumerator;
pub mod matcher;

pub use cancel::CancellationToken;
pub use engine::{search, Searcher};
pub use enumerator::enumerate;
pub use matcher::ContentMatcher;
