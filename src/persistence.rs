use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::errors::SettingsError;

/// Fixed key the whole settings object is stored under.
pub const SETTINGS_STORAGE_KEY: &str = "npmx-settings";

// --- KeyValueStorage Trait ---

/// Synchronous string-keyed, string-valued storage boundary.
#[cfg_attr(test, automock)]
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

// --- MemoryStorage ---

/// In-process storage, used by tests and embedders without a durable medium.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a single entry, for exercising the load path.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .entries
            .write()
            .unwrap()
            .insert(key.into(), value.into());
        storage
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// --- FileStorage ---

/// File-backed storage: one file per key under a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn ensure_directory(&self) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SettingsError::persistence_with_source(
                "set",
                format!("Failed to create storage directory '{}'", self.dir.display()),
                e,
            )
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!("No stored value at '{}'", path.display());
            return Ok(None);
        }

        fs::read_to_string(&path).map(Some).map_err(|e| {
            SettingsError::persistence_with_source(
                "get",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.ensure_directory()?;

        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| {
            SettingsError::persistence_with_source(
                "set",
                format!("Failed to write '{}'", path.display()),
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get(SETTINGS_STORAGE_KEY).unwrap(), None);

        storage
            .set(SETTINGS_STORAGE_KEY, r#"{"keyboardShortcuts":false}"#)
            .unwrap();
        assert_eq!(
            storage.get(SETTINGS_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"keyboardShortcuts":false}"#)
        );

        storage.clear();
        assert_eq!(storage.get(SETTINGS_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_storage_with_entry() {
        let storage = MemoryStorage::with_entry(SETTINGS_STORAGE_KEY, "{}");

        assert_eq!(
            storage.get(SETTINGS_STORAGE_KEY).unwrap().as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert_eq!(storage.get(SETTINGS_STORAGE_KEY).unwrap(), None);

        storage
            .set(SETTINGS_STORAGE_KEY, r#"{"keyboardShortcuts":true}"#)
            .unwrap();
        assert_eq!(
            storage.get(SETTINGS_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"keyboardShortcuts":true}"#)
        );
    }

    #[test]
    fn test_file_storage_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested").join("config"));

        storage.set(SETTINGS_STORAGE_KEY, "{}").unwrap();
        assert_eq!(
            storage.get(SETTINGS_STORAGE_KEY).unwrap().as_deref(),
            Some("{}")
        );
    }
}
