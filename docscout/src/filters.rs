/// File filtering for candidate documents.
///
/// Matching is deliberately literal: the configured extension is compared as a
/// case-sensitive suffix of the file name, so `report.docx` is a candidate for
/// `.docx` while `REPORT.DOCX` is not. Ignore patterns use glob syntax and are
/// matched against the full path with forward slashes.
use glob::Pattern;
use std::path::Path;

/// Checks if the file name ends with the given suffix (case-sensitive).
///
/// The comparison is done on the raw name, so names that are not valid UTF-8
/// still match.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(extension.as_bytes()))
}

/// Compiles ignore patterns, dropping the ones that are not valid globs
pub fn compile_patterns(ignore_patterns: &[String]) -> Vec<Pattern> {
    ignore_patterns
        .iter()
        .filter_map(|pattern| Pattern::new(pattern).ok())
        .collect()
}

/// Checks if a file should be ignored based on compiled ignore patterns
pub fn should_ignore(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    // Convert path to a format that matches the pattern style
    let normalized_path = path.to_string_lossy().replace('\\', "/");
    patterns.iter().any(|p| p.matches(&normalized_path))
}

/// Determines if a file is a candidate document
pub fn should_include_file(path: &Path, extension: &str, patterns: &[Pattern]) -> bool {
    has_extension(path, extension) && !should_ignore(path, patterns)
}
