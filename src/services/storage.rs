//! Persisted key-value storage for user preferences
//!
//! Preferences are kept as JSON values under string keys. `FileStore` writes
//! them to a single JSON object in the app directory; `MemoryStore` keeps
//! them for the current session only and is used whenever the file store
//! cannot be opened.

use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Injectable key-value capability
pub trait KeyValueStore: Send {
    /// Whether values written now will be readable in a later session
    fn is_available(&self) -> bool {
        true
    }

    /// Read a value; absent and unreadable values are both `None`
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value, replacing any previous one (last write wins)
    fn set(&mut self, key: &str, value: &Value) -> Result<()>;
}

/// Session-only storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            available: true,
        }
    }

    /// A store standing in for persistence that could not be opened
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            available: false,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn is_available(&self) -> bool {
        self.available
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// JSON-file backed storage
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use `path` as the backing file, creating its parent directory if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    /// Open a file store, degrading to session-only storage on failure
    pub fn open_or_memory(path: Option<PathBuf>) -> Box<dyn KeyValueStore> {
        let Some(path) = path else {
            tracing::warn!("no storage location available, preferences will not persist");
            return Box::new(MemoryStore::unavailable());
        };

        match Self::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not open preference storage");
                Box::new(MemoryStore::unavailable())
            }
        }
    }

    fn read_all(&self) -> Map<String, Value> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Map::new();
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::debug!(path = %self.path.display(), "ignoring malformed storage file");
                Map::new()
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        let mut all = self.read_all();
        all.insert(key.to_string(), value.clone());
        let contents = serde_json::to_string_pretty(&Value::Object(all))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert!(store.is_available());
        assert_eq!(store.get("k"), None);

        store.set("k", &json!([1, 2])).unwrap();
        assert_eq!(store.get("k"), Some(json!([1, 2])));

        store.set("k", &json!("later")).unwrap();
        assert_eq!(store.get("k"), Some(json!("later")));
    }

    #[test]
    fn test_unavailable_memory_store_still_holds_session_values() {
        let mut store = MemoryStore::unavailable();
        assert!(!store.is_available());
        store.set("k", &json!(true)).unwrap();
        assert_eq!(store.get("k"), Some(json!(true)));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("a", &json!({"x": 1})).unwrap();
        store.set("b", &json!("two")).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a"), Some(json!({"x": 1})));
        assert_eq!(reopened.get("b"), Some(json!("two")));
        assert_eq!(reopened.get("c"), None);
    }

    #[test]
    fn test_file_store_treats_malformed_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("a"), None);

        store.set("a", &json!(1)).unwrap();
        assert_eq!(store.get("a"), Some(json!(1)));
    }

    #[test]
    fn test_open_or_memory_without_location() {
        let store = FileStore::open_or_memory(None);
        assert!(!store.is_available());
    }
}
