//! Scoped load/mutate/commit access to one JSON-array key.
//!
//! A [`Collection`] owns an in-memory copy of the array. Nothing reaches the
//! store until [`Collection::commit`] is called, so an operation that bails
//! out early (validation failure, not found, protected record) leaves the
//! persisted blob untouched simply by dropping the guard.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

#[derive(Debug)]
pub struct Collection<'s, S: KeyValueStore + ?Sized, T> {
    store: &'s S,
    key: &'static str,
    items: Vec<T>,
    existed: bool,
}

impl<'s, S, T> Collection<'s, S, T>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + DeserializeOwned,
{
    /// Read and parse the array under `key`. An absent key is an empty
    /// collection; an unparsable value is [`StoreError::Corrupt`].
    pub fn load(store: &'s S, key: &'static str) -> Result<Self, StoreError> {
        let (items, existed) = match store.get(key)? {
            Some(raw) => {
                let items = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })?;
                (items, true)
            }
            None => (Vec::new(), false),
        };
        Ok(Self {
            store,
            key,
            items,
            existed,
        })
    }

    /// Whether the key was present in the store when loaded.
    pub fn existed(&self) -> bool {
        self.existed
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Serialize the whole array and write it back, returning the items.
    ///
    /// On failure the store still holds the previous value.
    pub fn commit(self) -> Result<Vec<T>, StoreError> {
        let raw = serde_json::to_string(&self.items)?;
        self.store.set(self.key, &raw)?;
        tracing::debug!(key = self.key, count = self.items.len(), "Collection committed");
        Ok(self.items)
    }
}

/// Read a whole collection without intending to write it back.
pub fn read_all<S, T>(store: &S, key: &'static str) -> Result<Vec<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + DeserializeOwned,
{
    Ok(Collection::load(store, key)?.into_items())
}

/// Read a single JSON value (not an array), e.g. the current session.
pub fn read_value<S, T>(store: &S, key: &'static str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Write a single JSON value.
pub fn write_value<S, T>(store: &S, key: &'static str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use assert_matches::assert_matches;

    #[test]
    fn absent_key_loads_empty() {
        let store = MemoryStore::new();
        let coll = Collection::<_, u32>::load(&store, "nums").unwrap();
        assert!(!coll.existed());
        assert!(coll.items().is_empty());
    }

    #[test]
    fn dropping_without_commit_writes_nothing() {
        let store = MemoryStore::new();
        store.set("nums", "[1,2]").unwrap();
        {
            let mut coll = Collection::<_, u32>::load(&store, "nums").unwrap();
            coll.items_mut().push(3);
        }
        assert_eq!(store.get("nums").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn commit_writes_compact_json() {
        let store = MemoryStore::new();
        let mut coll = Collection::<_, u32>::load(&store, "nums").unwrap();
        coll.items_mut().extend([1, 2, 3]);
        let items = coll.commit().unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(store.get("nums").unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn corrupt_value_is_reported_not_emptied() {
        let store = MemoryStore::new();
        store.set("nums", "{not json").unwrap();
        assert_matches!(
            Collection::<_, u32>::load(&store, "nums"),
            Err(StoreError::Corrupt { key, .. }) if key == "nums"
        );
    }

    #[test]
    fn failed_commit_keeps_previous_value() {
        let store = MemoryStore::with_quota(12);
        store.set("nums", "[1]").unwrap();
        let mut coll = Collection::<_, u32>::load(&store, "nums").unwrap();
        coll.items_mut().extend([100, 200, 300]);
        assert_matches!(coll.commit(), Err(StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get("nums").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn single_values_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(read_value::<_, String>(&store, "who").unwrap(), None);
        write_value(&store, "who", &"admin".to_string()).unwrap();
        assert_eq!(
            read_value::<_, String>(&store, "who").unwrap().as_deref(),
            Some("admin")
        );
    }
}
