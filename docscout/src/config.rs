use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// Extension searched for when none is configured
pub const DEFAULT_EXTENSION: &str = ".docx";

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.docscout.yaml` in the current directory
/// 3. Global `$HOME/.config/docscout/config.yaml`
///
/// # Configuration Format
///
/// ```yaml
/// # Substring to look for (case-sensitive)
/// target: "hirusha"
///
/// # Directories to scan; a bare path lists only its immediate entries
/// roots:
///   - "/data/reports"
///   - path: "/data/archive"
///     recursive: true
///
/// # File name suffix of candidate documents
/// extension: ".docx"
///
/// # Patterns to ignore (glob syntax)
/// ignore_patterns:
///   - "**/~$*"
///
/// # Worker count (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// # CLI Integration
///
/// When using the CLI, command-line arguments take precedence over config file values.
/// The merging behavior is defined in the `merge_with_cli` method.
///
/// # Validation
///
/// Every field is optional in the file, so a loaded config may still be unusable.
/// [`SearchConfig::validate`] is run by the coordinator before it touches the
/// filesystem and rejects an empty target or an empty root list with
/// [`SearchError::InvalidConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// The substring to search for
    pub target: String,

    /// Directories to search, in order
    pub roots: Vec<RootSpec>,

    /// Case-sensitive file name suffix (e.g. ".docx")
    pub extension: String,

    /// Patterns to ignore (supports glob syntax)
    pub ignore_patterns: Vec<String>,

    /// Maximum number of documents processed at once.
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// A directory to search and whether to descend into its subdirectories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RootEntry")]
pub struct RootSpec {
    pub path: PathBuf,
    pub recursive: bool,
}

/// On-disk shape of a root: either a bare path or a full map
#[derive(Deserialize)]
#[serde(untagged)]
enum RootEntry {
    Path(PathBuf),
    Full {
        path: PathBuf,
        #[serde(default)]
        recursive: bool,
    },
}

impl From<RootEntry> for RootSpec {
    fn from(entry: RootEntry) -> Self {
        match entry {
            RootEntry::Path(path) => RootSpec {
                path,
                recursive: false,
            },
            RootEntry::Full { path, recursive } => RootSpec { path, recursive },
        }
    }
}

impl RootSpec {
    pub fn new(path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
        }
    }
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            roots: Vec::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            ignore_patterns: Vec::new(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Creates a validated configuration searching `roots` non-recursively
    pub fn new<I, P>(target: impl Into<String>, roots: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let config = SearchConfig {
            target: target.into(),
            roots: roots
                .into_iter()
                .map(|path| RootSpec::new(path, false))
                .collect(),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder method to make every root recursive (or not)
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        for root in &mut self.roots {
            root.recursive = recursive;
        }
        self
    }

    /// Builder method to set the number of worker threads
    pub fn with_thread_count(mut self, count: NonZeroUsize) -> Self {
        self.thread_count = count;
        self
    }

    /// Builder method to set the file name suffix
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Builder method to set ignore patterns
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Checks the invariants a run depends on. Performs no I/O.
    pub fn validate(&self) -> SearchResult<()> {
        if self.target.is_empty() {
            return Err(SearchError::invalid_config("target must not be empty"));
        }
        if self.roots.is_empty() {
            return Err(SearchError::invalid_config(
                "at least one root directory is required",
            ));
        }
        for pattern in &self.ignore_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                SearchError::invalid_config(format!("invalid ignore pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }

    /// Loads configuration from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(SearchError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("docscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".docscout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// Every value the command line supplied replaces the file value, even
    /// when it equals the default.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(target) = cli.target {
            self.target = target;
        }
        if let Some(roots) = cli.roots {
            self.roots = roots;
        }
        if let Some(extension) = cli.extension {
            self.extension = extension;
        }
        if let Some(ignore_patterns) = cli.ignore_patterns {
            self.ignore_patterns = ignore_patterns;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Settings given on the command line; `None` means the flag was not passed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub target: Option<String>,
    pub roots: Option<Vec<RootSpec>>,
    pub extension: Option<String>,
    pub ignore_patterns: Option<Vec<String>>,
    pub thread_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        config_path
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = write_config(
            &dir,
            r#"
            target: "hirusha"
            roots:
              - "/data/reports"
              - path: "/data/archive"
                recursive: true
            extension: ".DOCX"
            ignore_patterns: ["**/~$*"]
            thread_count: 4
            log_level: "debug"
        "#,
        );

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.target, "hirusha");
        assert_eq!(
            config.roots,
            vec![
                RootSpec::new("/data/reports", false),
                RootSpec::new("/data/archive", true),
            ]
        );
        assert_eq!(config.extension, ".DOCX");
        assert_eq!(config.ignore_patterns, vec!["**/~$*".to_string()]);
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = write_config(
            &dir,
            r#"
            target: "needle"
            roots: ["."]
        "#,
        );

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.target, "needle");
        assert_eq!(config.roots, vec![RootSpec::new(".", false)]);
        assert_eq!(config.extension, DEFAULT_EXTENSION);
        assert!(config.ignore_patterns.is_empty());
        assert_eq!(
            config.thread_count,
            NonZeroUsize::new(num_cpus::get()).unwrap()
        );
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = write_config(
            &dir,
            r#"
            roots: 123  # Should be a list
            thread_count: "invalid"  # Should be number
        "#,
        );

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(matches!(result, Err(SearchError::ConfigError(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SearchConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(matches!(result, Err(SearchError::ConfigError(_))));
    }

    #[test]
    fn test_merge_with_cli() {
        let config_file = SearchConfig {
            target: "from-file".to_string(),
            roots: vec![RootSpec::new("/srv/docs", true)],
            extension: ".docm".to_string(),
            ignore_patterns: vec!["**/drafts/**".to_string()],
            thread_count: NonZeroUsize::new(4).unwrap(),
            log_level: "warn".to_string(),
        };

        let cli = CliOverrides {
            target: Some("from-cli".to_string()),
            thread_count: NonZeroUsize::new(8),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };

        let merged = config_file.merge_with_cli(cli);
        assert_eq!(merged.target, "from-cli"); // CLI value
        assert_eq!(merged.roots, vec![RootSpec::new("/srv/docs", true)]); // File value
        assert_eq!(merged.extension, ".docm"); // File value
        assert_eq!(merged.ignore_patterns, vec!["**/drafts/**".to_string()]); // File value
        assert_eq!(merged.thread_count.get(), 8); // CLI value
        assert_eq!(merged.log_level, "debug"); // CLI value
    }

    #[test]
    fn test_cli_values_equal_to_defaults_still_win() {
        let config_file = SearchConfig {
            target: "from-file".to_string(),
            roots: vec![RootSpec::new("/srv/docs", false)],
            extension: ".docm".to_string(),
            thread_count: NonZeroUsize::new(2).unwrap(),
            log_level: "debug".to_string(),
            ..Default::default()
        };

        let cli = CliOverrides {
            extension: Some(DEFAULT_EXTENSION.to_string()),
            thread_count: Some(default_thread_count()),
            log_level: Some(default_log_level()),
            ..Default::default()
        };

        let merged = config_file.merge_with_cli(cli);
        assert_eq!(merged.extension, DEFAULT_EXTENSION);
        assert_eq!(merged.thread_count, default_thread_count());
        assert_eq!(merged.log_level, "info");
        assert_eq!(merged.target, "from-file");
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let config_file = SearchConfig::new("hirusha", ["/data"]).unwrap();
        let merged = config_file.clone().merge_with_cli(CliOverrides::default());
        assert_eq!(merged, config_file);
    }

    #[test]
    fn test_new_validates() {
        let config = SearchConfig::new("hirusha", ["/data"]).unwrap();
        assert_eq!(config.roots, vec![RootSpec::new("/data", false)]);
        assert_eq!(config.extension, ".docx");

        let err = SearchConfig::new("", ["/data"]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));

        let err = SearchConfig::new("hirusha", Vec::<PathBuf>::new()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_ignore_pattern_rejected() {
        let config = SearchConfig::new("x", ["/data"])
            .unwrap()
            .with_ignore_patterns(vec!["[unclosed".to_string()]);
        assert!(matches!(
            config.validate(),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_with_recursive_applies_to_all_roots() {
        let config = SearchConfig::new("x", ["a", "b"])
            .unwrap()
            .with_recursive(true);
        assert!(config.roots.iter().all(|root| root.recursive));
    }
}
