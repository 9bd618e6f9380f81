pub mod config;
pub mod document;
pub mod errors;
pub mod filters;
pub mod report;
pub mod results;
pub mod search;

pub use config::{CliOverrides, RootSpec, SearchConfig};
pub use document::{DocumentReader, DocxReader};
pub use errors::{SearchError, SearchResult};
pub use report::{ProgressReporter, Reporter, TracingReporter};
pub use results::{FileOutcome, SearchResult as SearchOutput, WorkItem};
pub use search::{search, CancellationToken, ContentMatcher, Searcher};
