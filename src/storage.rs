//! Persistent key/value storage
//!
//! The dashboard keeps two small records between runs: the theme preference
//! and the last fetched quote. Both live in a flat string map.
//! Storage file location: ~/.local/share/daybar/storage.json

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Key holding the theme preference ("light" | "dark")
pub const THEME_KEY: &str = "theme";

/// Key holding the JSON-encoded cached quote
pub const QUOTE_KEY: &str = "cachedQuote";

/// String key/value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage backed by a JSON object on disk
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Get the default storage file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("storage.json"))
    }

    /// Open the default storage file
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open a storage file. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "storage file not found, starting empty");
            return Ok(Self { path, entries: BTreeMap::new() });
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage from {:?}", path))?;

        let entries = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "storage file is corrupt, starting empty");
                BTreeMap::new()
            }
        };

        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create storage directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize storage")?;

        // Write beside the target, then rename over it
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write storage to {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace storage at {:?}", self.path))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Storage that lives only as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Per-user data directory for daybar
pub fn data_dir() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .context("Could not determine data directory")?
        .join("daybar"))
}
