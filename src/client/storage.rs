//! Durable key-value persistence for client state.

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::ClientResult;

/// Persistence port for the client store.
///
/// Values are opaque strings keyed by name, like browser local storage.
pub trait StateStorage: Send + Sync {
    /// Load the value stored under `key`, if any.
    fn load(&self, key: &str) -> ClientResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> ClientResult<()>;
}

/// Load and decode a JSON value stored under `key`.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn StateStorage,
    key: &str,
) -> ClientResult<Option<T>> {
    match storage.load(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn StateStorage,
    key: &str,
    value: &T,
) -> ClientResult<()> {
    let raw = serde_json::to_string(value)?;
    storage.save(key, &raw)
}

/// Volatile storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON file backed storage.
///
/// The whole key space lives in one JSON object on disk and is cached in
/// memory; every save rewrites the file.
#[derive(Debug)]
pub struct JsonFileStorage {
    file_path: PathBuf,
    /// In-memory cache for fast reads.
    cache: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Open the storage file, starting empty if it does not exist yet.
    pub fn open(file_path: impl AsRef<Path>) -> ClientResult<Self> {
        let storage = Self {
            file_path: file_path.as_ref().to_path_buf(),
            cache: RwLock::new(BTreeMap::new()),
        };

        storage.load_file()?;

        Ok(storage)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn load_file(&self) -> ClientResult<()> {
        if !self.file_path.exists() {
            tracing::debug!(path = %self.file_path.display(), "State file not found, starting fresh");
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.file_path)?;
        let entries: BTreeMap<String, String> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                let corrupt_path = self.file_path.with_extension("json.corrupt");
                tracing::warn!(
                    path = %self.file_path.display(),
                    moved_to = %corrupt_path.display(),
                    error = %e,
                    "Unreadable state file, starting fresh"
                );
                std::fs::rename(&self.file_path, &corrupt_path)?;
                return Ok(());
            }
        };

        let mut cache = self.cache.write();
        *cache = entries;

        tracing::debug!(keys = cache.len(), "Loaded client state file");
        Ok(())
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        let content = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write atomically using temp file
        let temp_path = self.file_path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.file_path)?;

        tracing::debug!(path = %self.file_path.display(), "Saved client state file");
        Ok(())
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.cache.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut cache = self.cache.write();
        cache.insert(key.to_string(), value.to_string());
        self.write_file(&cache)
    }
}

/// Thread-safe handle to a storage port.
pub type SharedStorage = Arc<dyn StateStorage>;
