//! Binary entry point: configuration, logging, then the Ratatui event loop
//! over an empty in-memory store.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use student_records::{logging, run_app, App, AppConfig, NoticeBoard, StudentStore};

#[derive(Parser)]
#[command(name = "student-records", about = "Manage student records in the terminal")]
struct Cli {
    /// Configuration file (defaults to the user's config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file, overriding the configured one.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `student_records=debug`.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let log_path = logging::resolve_log_path(cli.log_file.as_deref(), &config.logging)?;
    let filter = logging::build_filter(cli.log_level.as_deref(), &config.logging)?;
    logging::init(&log_path, filter)?;

    let catalog = config.catalog();
    tracing::info!(courses = catalog.len(), "starting student records");

    let notices = NoticeBoard::new();
    let store = StudentStore::new(notices.clone());
    let mut app = App::new(store, catalog, notices);

    let result = run_app(&mut app);
    match &result {
        Ok(()) => tracing::info!(students = app.store().len(), "session ended"),
        Err(err) => tracing::error!(error = %format!("{err:#}"), "session aborted"),
    }
    result
}
