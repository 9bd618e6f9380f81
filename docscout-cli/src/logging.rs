use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Where log records go for this process
pub struct LogSettings<'a> {
    pub level: &'a str,
    /// Directory for the per-run log file; `None` logs to stderr only
    pub directory: Option<&'a Path>,
}

/// Installs the process-wide subscriber.
///
/// `RUST_LOG` wins over `level`. Returns the path of the log file, if one was
/// created.
pub fn init(settings: LogSettings<'_>) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.level))
        .context("invalid log level")?;

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, log_path) = match settings.directory {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let path = dir.join(log_file_name(&Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(log_path)
}

/// `2024-05-01_13-45-09.log`, stamped with the wall clock of `now`'s zone
fn log_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}
