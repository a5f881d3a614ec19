//! Configuration management for daybar
//!
//! Handles loading, saving, and default configuration values.
//! Config file location: ~/.config/daybar/config.toml

use crate::quote::DEFAULT_ENDPOINT;
use crate::scheduler::QUOTE_CHECK_INTERVAL_MS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub quotes: QuoteOptions,
    pub display: DisplayOptions,
    pub logging: LogOptions,
}

impl Config {
    /// Get the config file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("daybar");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }
}

/// Quote fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteOptions {
    pub enabled: bool,
    pub endpoint: String,
    /// Whole-request timeout for one fetch
    pub timeout_secs: u64,
}

impl QuoteOptions {
    /// Clamped below the hourly check so a stalled request never outlives it
    pub fn timeout(&self) -> Duration {
        let max = Duration::from_millis(QUOTE_CHECK_INTERVAL_MS as u64 / 2);
        Duration::from_secs(self.timeout_secs.max(1)).min(max)
    }
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Which panels are shown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub show_week_number: bool,
    pub show_progress: bool,
    pub show_quote: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_week_number: true,
            show_progress: true,
            show_quote: true,
        }
    }
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// Default filter directive, overridden by RUST_LOG
    pub level: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self { level: "daybar=info".to_string() }
    }
}
