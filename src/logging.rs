//! File-backed `tracing` setup. The terminal belongs to the TUI while the app
//! runs, so log lines go to a file instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{default_log_path, LoggingConfig, DEFAULT_LOG_FILTER};

/// Pick the log file: CLI override, then config, then the data directory.
pub fn resolve_log_path(cli: Option<&Path>, config: &LoggingConfig) -> Result<PathBuf> {
    if let Some(path) = cli.or(config.file.as_deref()) {
        return Ok(path.to_path_buf());
    }
    default_log_path().context("failed to resolve default log file location")
}

/// Build the filter from the CLI directive, the config directive, or the
/// crate default, in that order.
pub fn build_filter(cli: Option<&str>, config: &LoggingConfig) -> Result<EnvFilter> {
    let directive = cli
        .or(config.level.as_deref())
        .unwrap_or(DEFAULT_LOG_FILTER);
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter {directive:?}"))
}

/// Install the global subscriber writing to `path` (appending).
pub fn init(path: &Path, filter: EnvFilter) -> Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .context("failed to install tracing subscriber")?;

    tracing::info!(log_file = %path.display(), "logging initialised");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
