//! Log setup
//!
//! The terminal belongs to the dashboard, so log lines go to a file next to
//! the storage file: ~/.local/share/daybar/daybar.log

use crate::config::LogOptions;
use crate::storage;
use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber and return the log file path
pub fn init(options: &LogOptions, verbose: bool) -> Result<PathBuf> {
    let dir = storage::data_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let path = dir.join("daybar.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(env_filter(options, verbose))
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("Failed to install log subscriber")?;

    Ok(path)
}

/// RUST_LOG wins; otherwise -v or the configured directive
fn env_filter(options: &LogOptions, verbose: bool) -> EnvFilter {
    let default = if verbose { "daybar=debug" } else { options.level.as_str() };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("daybar=info"))
}
