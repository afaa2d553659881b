//! Preference store backends.
//!
//! The store is a flat string key-value mapping with last-write-wins
//! semantics per key. The file-backed store persists to a TOML table in
//! the config directory and writes through on every set; the in-memory
//! store backs tests.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Narrow key-value capability the engine and commands talk to.
///
/// Implementations serialize access internally; callers never hold a lock
/// across calls.
pub trait PrefStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn keys(&self) -> Vec<String>;
}

/// TOML-file-backed store. Loads once at open; every `set` updates the
/// in-memory table and writes the file through. A failed write is logged
/// and the in-memory value stands (next write retries the file).
pub struct FilePrefStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FilePrefStore {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let contents = match toml::to_string_pretty(entries) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("failed to serialize preferences: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create preference directory: {}", e);
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, contents) {
            tracing::warn!("failed to write {}: {}", self.path.display(), e);
        }
    }
}

impl PrefStore for FilePrefStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

/// Volatile store backing tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryPrefStore {
    entries: Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl PrefStore for MemoryPrefStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}
