//! Synchronous string-keyed storage backends.
//!
//! The repositories only need whole-value get/set/remove. Every `set`
//! replaces the previous value atomically: either the new value is stored in
//! full or the old one is left untouched.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;

/// A durable mapping from key to serialized JSON value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Check that writing `value` under `key` fits within `quota`, given the
/// bytes currently used by all keys and the size of the value being replaced.
fn check_quota(
    key: &str,
    value: &str,
    used: usize,
    replaced: usize,
    quota: Option<usize>,
) -> Result<(), StoreError> {
    let Some(limit) = quota else {
        return Ok(());
    };
    let needed = used.saturating_sub(replaced) + key.len() + value.len();
    if needed > limit {
        return Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            needed,
            limit,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store. Usage is counted as key bytes plus value bytes, the way
/// browser storage quotas are.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes pushing usage past `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(limit),
        }
    }

    /// Total bytes used by all keys and values.
    pub fn used_bytes(&self) -> usize {
        self.lock().iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written value:
        // inserts are single operations.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        let used: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
        let replaced = entries.get(key).map_or(0, |v| key.len() + v.len());
        check_quota(key, value, used, replaced, self.quota)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

const VALUE_EXT: &str = "json";
const TEMP_EXT: &str = "json.tmp";

/// One `<key>.json` file per key inside a data directory.
///
/// Writes go to `<key>.json.tmp` and are renamed over the target, so a
/// failed write never leaves a truncated value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, quota: None })
    }

    /// Apply a byte quota across all keys.
    pub fn with_quota(mut self, limit: usize) -> Self {
        self.quota = Some(limit);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str, ext: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{ext}")))
    }

    /// Bytes used by all stored values, counted the same way as [`MemoryStore`].
    pub fn used_bytes(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXT) {
                continue;
            }
            let key_len = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map_or(0, str::len);
            total += key_len + fs::metadata(&path)?.len() as usize;
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key, VALUE_EXT)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key, VALUE_EXT)?;
        if self.quota.is_some() {
            let replaced = match fs::metadata(&path) {
                Ok(meta) => key.len() + meta.len() as usize,
                Err(e) if e.kind() == ErrorKind::NotFound => 0,
                Err(e) => return Err(e.into()),
            };
            check_quota(key, value, self.used_bytes()?, replaced, self.quota)?;
        }

        let tmp = self.path_for(key, TEMP_EXT)?;
        let mut file = fs::File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &path)?;
        tracing::debug!(key, bytes = value.len(), "Value written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key, VALUE_EXT)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn memory_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn memory_set_replaces_value() {
        let store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.used_bytes(), 4);
    }

    #[test]
    fn memory_quota_rejects_and_keeps_old_value() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap();
        assert_matches!(
            store.set("k", "0123456789"),
            Err(StoreError::QuotaExceeded { needed: 11, limit: 10, .. })
        );
        assert_eq!(store.get("k").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn memory_quota_counts_replaced_value_as_freed() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "123456789").unwrap();
        // Replacing a 9-byte value with another 9-byte value fits.
        store.set("k", "987654321").unwrap();
    }

    #[test]
    fn memory_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_round_trip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("forumTopics").unwrap(), None);

        store.set("forumTopics", "[]").unwrap();
        assert_eq!(store.get("forumTopics").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("forumTopics.json").exists());
        assert!(!dir.path().join("forumTopics.json.tmp").exists());

        store.remove("forumTopics").unwrap();
        assert_eq!(store.get("forumTopics").unwrap(), None);
    }

    #[test]
    fn file_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_matches!(store.set("../escape", "x"), Err(StoreError::InvalidKey(_)));
        assert_matches!(store.get(""), Err(StoreError::InvalidKey(_)));
    }

    #[test]
    fn file_quota_rejects_and_keeps_old_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap().with_quota(12);
        store.set("key", "[1,2]").unwrap();
        assert_matches!(
            store.set("key", "[1,2,3,4,5]"),
            Err(StoreError::QuotaExceeded { .. })
        );
        assert_eq!(store.get("key").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(store.used_bytes().unwrap(), 8);
    }
}
