//! Durable key-value storage for operator-local state.
//!
//! Values are opaque strings; callers choose the encoding. The file store
//! keeps one file per key so state survives restarts.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Errors from a key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// String-keyed persistent storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// File-backed store, one `<key>.json` file per entry.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn get_path(&self, key: &str) -> PathBuf {
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.dir.join(format!("{}.json", safe_key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.get_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.get_path(key);
        // Write then rename so a crash never leaves a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("Persisted {} to {:?}", key, path);
        Ok(())
    }
}

/// In-process store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store(name: &str) -> FileStore {
        let dir = std::env::temp_dir().join(format!("lantern_watch_store_{}_{}", name, std::process::id()));
        if dir.exists() {
            let _ = fs::remove_dir_all(&dir);
        }
        FileStore::open(dir).unwrap()
    }

    fn cleanup_test_store(store: &FileStore) {
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_file_store_set_and_get() {
        let store = create_test_store("set_get");

        store.set("read_notifications", r#"["a","b"]"#).unwrap();
        let value = store.get("read_notifications").unwrap();

        assert_eq!(value.as_deref(), Some(r#"["a","b"]"#));
        cleanup_test_store(&store);
    }

    #[test]
    fn test_file_store_missing_key() {
        let store = create_test_store("missing");

        assert_eq!(store.get("nothing").unwrap(), None);
        cleanup_test_store(&store);
    }

    #[test]
    fn test_file_store_overwrite() {
        let store = create_test_store("overwrite");

        store.set("key", "one").unwrap();
        store.set("key", "two").unwrap();

        assert_eq!(store.get("key").unwrap().as_deref(), Some("two"));
        cleanup_test_store(&store);
    }

    #[test]
    fn test_file_store_key_sanitization() {
        let store = create_test_store("sanitize");

        store.set("profile/a:b", "v").unwrap();
        assert_eq!(store.get("profile/a:b").unwrap().as_deref(), Some("v"));
        assert!(store.dir().join("profile_a_b.json").exists());
        cleanup_test_store(&store);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::with_value("k", "v");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
