mod logging;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use docscout::{
    search::enumerate, CliOverrides, ProgressReporter, RootSpec, SearchConfig, SearchOutput,
    Searcher, TracingReporter,
};
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that discovers documents
#[derive(Args)]
struct DiscoveryArgs {
    /// Directory to search (can be specified multiple times; default: current directory)
    #[arg(short = 'd', long = "dir")]
    dirs: Vec<PathBuf>,

    /// Descend into subdirectories of every directory
    #[arg(short, long)]
    recursive: bool,

    /// File name suffix of candidate documents [default: .docx]
    #[arg(short, long)]
    extension: Option<String>,

    /// Patterns to ignore (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for per-run log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Log to stderr only
    #[arg(long)]
    no_log_file: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search documents for a word
    Search {
        /// The word to search for (prompted for when missing)
        #[arg(short, long)]
        word: Option<String>,

        /// Number of threads to use
        #[arg(short = 'j', long)]
        threads: Option<NonZeroUsize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },

    /// List the documents a search would inspect
    List {
        #[command(flatten)]
        discovery: DiscoveryArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            word,
            threads,
            json,
            progress,
            discovery,
        } => {
            let mut config = load_config(&discovery, word, threads)?;
            init_logging(&discovery, &config)?;

            if config.target.is_empty() {
                config.target = prompt_for_word()?;
            }

            let searcher = if progress {
                Searcher::new().with_reporter(Arc::new(ProgressReporter::new(TracingReporter)))
            } else {
                Searcher::new()
            };
            let result = searcher.run(&config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_search_results(&result);
            }
            Ok(())
        }
        Commands::List { discovery } => {
            let mut config = load_config(&discovery, None, None)?;
            init_logging(&discovery, &config)?;

            // Listing never opens documents, so any target passes validation
            if config.target.is_empty() {
                config.target = "*".to_string();
            }
            config.validate()?;

            let items = enumerate(&config, &TracingReporter);
            for item in &items {
                println!("{}", item.path().display());
            }
            println!("\n{} candidate documents", items.len());
            Ok(())
        }
    }
}

/// Config files first, then CLI flags on top
fn load_config(
    discovery: &DiscoveryArgs,
    word: Option<String>,
    threads: Option<NonZeroUsize>,
) -> Result<SearchConfig> {
    let file_config = SearchConfig::load_from(discovery.config.as_deref())
        .context("failed to load configuration")?;

    let cli = CliOverrides {
        target: word,
        roots: (!discovery.dirs.is_empty()).then(|| {
            discovery
                .dirs
                .iter()
                .map(|dir| RootSpec::new(dir, discovery.recursive))
                .collect()
        }),
        extension: discovery.extension.clone(),
        ignore_patterns: (!discovery.ignore.is_empty()).then(|| discovery.ignore.clone()),
        thread_count: threads,
        log_level: discovery.log_level.clone(),
    };

    let mut config = file_config.merge_with_cli(cli);
    if discovery.recursive {
        config = config.with_recursive(true);
    }
    if config.roots.is_empty() {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        config.roots.push(RootSpec::new(cwd, discovery.recursive));
    }
    Ok(config)
}

fn init_logging(discovery: &DiscoveryArgs, config: &SearchConfig) -> Result<()> {
    let directory = (!discovery.no_log_file).then_some(discovery.log_dir.as_path());
    let log_path = logging::init(logging::LogSettings {
        level: &config.log_level,
        directory,
    })?;
    match log_path {
        Some(path) => info!("Logging to {}", path.display()),
        None => debug!("File logging disabled"),
    }
    Ok(())
}

/// Prompts on stderr; stdout carries only the result
fn prompt_for_word() -> Result<String> {
    eprint!("Enter the word to search for: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let word = line.trim_end_matches(['\r', '\n']).to_string();
    if word.is_empty() {
        bail!("no word to search for");
    }
    Ok(word)
}

fn print_search_results(result: &SearchOutput) {
    for path in &result.matched_paths {
        println!("{}", path.display().to_string().blue());
    }

    println!(
        "\nFound {} matching documents in {} searched ({} unreadable) in {}",
        result.files_with_matches(),
        result.files_searched,
        result.files_failed,
        humantime::format_duration(result.elapsed)
    );
    if result.cancelled {
        println!(
            "{}",
            format!(
                "Search stopped early: {} of {} documents searched",
                result.files_searched, result.candidates
            )
            .yellow()
        );
    }
}
