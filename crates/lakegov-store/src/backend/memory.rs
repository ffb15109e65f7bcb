//! In-memory object store.

use super::ObjectStore;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

/// In-memory object store, used as the test fake for every component that
/// persists objects.
#[derive(Default)]
pub struct InMemoryStore {
    data: DashMap<String, Bytes>,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clears all objects.
    pub fn clear(&self) {
        self.data.clear();
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes) -> StoreResult<()> {
        self.data.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        self.data
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.data.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.data.contains_key(key))
    }

    async fn list(&self, prefix: Option<&str>) -> StoreResult<Vec<String>> {
        let keys = match prefix {
            Some(p) => self
                .data
                .iter()
                .filter(|entry| entry.key().starts_with(p))
                .map(|entry| entry.key().clone())
                .collect(),
            None => self.data.iter().map(|entry| entry.key().clone()).collect(),
        };
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = InMemoryStore::new();
        store.put("k", Bytes::from("v")).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Bytes::from("v"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.get("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_with_prefix() {
        let store = InMemoryStore::new();
        store.put("lineage/a.json", Bytes::from("a")).await.unwrap();
        store.put("lineage/b.json", Bytes::from("b")).await.unwrap();
        store.put("reports/c.json", Bytes::from("c")).await.unwrap();

        let keys = store.list(Some("lineage/")).await.unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryStore::new();
        store.put("k", Bytes::from("v")).await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(!store.exists("k").await.unwrap());
    }
}
