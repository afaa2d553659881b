//! File logging.
//!
//! The terminal belongs to the TUI, so tracing output goes to a log file
//! in the data directory. `RUST_LOG` overrides the configured filter.

use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crabwatch")
        .join("crabwatch.log")
}

/// Initialize the global tracing subscriber. Returns the log file path so
/// startup can tell the operator where to tail.
pub fn init(filter: &str) -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| filter.to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter.as_str())
        .with_ansi(false)
        .init();

    Ok(path)
}
