/// This module defines the error types for docscout.
///
/// # Fatal vs Recoverable
///
/// Only [`SearchError::InvalidConfig`] ever escapes a search run. Every other
/// variant produced while a run is in progress is absorbed by the coordinator:
/// it is reported through the [`Reporter`](crate::report::Reporter) and turned
/// into an unmatched [`FileOutcome`](crate::results::FileOutcome), so one bad
/// file or directory never aborts the scan.
///
/// ```rust,ignore
/// match searcher.run(&config) {
///     Ok(result) => // Every candidate has an outcome,
///     Err(SearchError::InvalidConfig(msg)) => // Nothing was touched on disk,
///     Err(e) => unreachable!(),
/// }
/// ```
///
/// `ConfigError` belongs to the front end, which loads config files before a
/// run is started.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Cannot read directory {path}: {reason}")]
    DirectoryUnreadable { path: PathBuf, reason: String },
    #[error("Cannot read document {path}: {reason}")]
    DocumentUnreadable { path: PathBuf, reason: String },
    #[error("Worker failed on {path}: {reason}")]
    WorkerFailure { path: PathBuf, reason: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SearchError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn directory_unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DirectoryUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn document_unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DocumentUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn worker_failure(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::WorkerFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
