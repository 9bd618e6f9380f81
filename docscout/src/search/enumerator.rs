use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::config::{RootSpec, SearchConfig};
use crate::errors::SearchError;
use crate::filters::{compile_patterns, should_include_file};
use crate::report::Reporter;
use crate::results::WorkItem;

/// Lists the candidate documents of every configured root.
///
/// Roots are visited in configured order and each root in directory traversal
/// order. A root or subdirectory that cannot be listed is reported and skipped;
/// the other roots are still enumerated. A file reachable from two roots is
/// emitted once, at its first position.
pub fn enumerate(config: &SearchConfig, reporter: &dyn Reporter) -> Vec<WorkItem> {
    let target: Arc<str> = Arc::from(config.target.as_str());
    let patterns = compile_patterns(&config.ignore_patterns);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for root in &config.roots {
        for path in walk_root(root, reporter) {
            if !should_include_file(&path, &config.extension, &patterns) {
                continue;
            }
            if !seen.insert(path.clone()) {
                debug!("Skipping duplicate candidate: {}", path.display());
                continue;
            }
            items.push(WorkItem::new(path, Arc::clone(&target)));
        }
    }

    debug!("Found {} candidate documents", items.len());
    items
}

/// Regular files under one root, in traversal order
fn walk_root(root: &RootSpec, reporter: &dyn Reporter) -> Vec<PathBuf> {
    match root.path.metadata() {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            reporter.directory_skipped(
                &root.path,
                &SearchError::directory_unreadable(&root.path, "not a directory"),
            );
            return Vec::new();
        }
        Err(e) => {
            reporter.directory_skipped(
                &root.path,
                &SearchError::directory_unreadable(&root.path, e),
            );
            return Vec::new();
        }
    }

    let mut walker = WalkBuilder::new(&root.path);
    walker.standard_filters(false).follow_links(false);
    if !root.recursive {
        walker.max_depth(Some(1));
    }

    let mut files = Vec::new();
    for entry in walker.build() {
        match entry {
            Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                files.push(entry.into_path())
            }
            Ok(_) => {}
            Err(err) => {
                let path = error_path(&err).unwrap_or_else(|| root.path.clone());
                reporter.directory_skipped(&path, &SearchError::directory_unreadable(&path, &err));
            }
        }
    }
    files
}

/// Digs the offending path out of a walker error
fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}
