//! Key/value backends that hold serialized cache documents.
//!
//! A store only moves opaque strings; parsing and corruption handling
//! belong to [`ImageCache`](crate::ImageCache).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CacheError;

/// A string-keyed durable slot store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the document stored under `key`, or `None` if nothing is stored.
    async fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Replace the document stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One JSON file per key inside a cache directory.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the
/// target, so readers see either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        if !is_safe_key(key) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Keys become file names: alphanumeric, hyphen, underscore, dot only.
fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[async_trait]
impl CacheStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        let io_err = |source| CacheError::Io {
            key: key.to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "Cache document written");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Process-local store for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot before handing the store to a cache.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.lock().insert(key.into(), value.into());
        self
    }

    /// Current raw document under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_keys() {
        assert!(is_safe_key("lumina_ai_images_cache_v2"));
        assert!(is_safe_key("lumina_ai_images_cache_v2_categories"));
        assert!(is_safe_key("a-b.c"));
    }

    #[test]
    fn unsafe_keys() {
        assert!(!is_safe_key(""));
        assert!(!is_safe_key("../etc/passwd"));
        assert!(!is_safe_key(".hidden"));
        assert!(!is_safe_key("a/b"));
        assert!(!is_safe_key(&"k".repeat(200)));
    }

    #[tokio::test]
    async fn file_store_round_trip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.read("slot").await.unwrap(), None);

        store.write("slot", r#"{"a":"b"}"#).await.unwrap();
        assert_eq!(store.read("slot").await.unwrap().as_deref(), Some(r#"{"a":"b"}"#));
        assert!(dir.path().join("nested/slot.json").exists());
        assert!(!dir.path().join("nested/slot.json.tmp").exists());

        store.write("slot", "{}").await.unwrap();
        assert_eq!(store.read("slot").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.write("../escape", "{}").await,
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn memory_store_seeding() {
        let store = MemoryStore::new().with_entry("k", "v");
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("v"));
        store.write("k", "w").await.unwrap();
        assert_eq!(store.get("k").as_deref(), Some("w"));
    }
}
