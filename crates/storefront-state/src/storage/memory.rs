//! In-memory storage backend.
//!
//! Clones share the same map, which is how tests simulate a reload: build
//! fresh stores over a clone of the old storage and rehydrate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{check_key, KeyValueStorage};
use crate::error::{StorageError, StorageResult};

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
    /// Maximum total bytes (keys + values), like a browser storage quota.
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that rejects writes pushing it past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        MemoryStorage {
            items: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        check_key(key)?;
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        check_key(key)?;
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        check_key(key)?;
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart-storage").unwrap(), None);

        storage.set_item("cart-storage", "{}").unwrap();
        assert_eq!(storage.get_item("cart-storage").unwrap().as_deref(), Some("{}"));

        storage.remove_item("cart-storage").unwrap();
        storage.remove_item("cart-storage").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clones_share_contents() {
        let storage = MemoryStorage::new();
        let reloaded = storage.clone();
        storage.set_item("theme-storage", "x").unwrap();
        assert_eq!(reloaded.get_item("theme-storage").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_quota_exceeded_leaves_previous_value() {
        let storage = MemoryStorage::with_quota(20);
        storage.set_item("k", "small").unwrap();

        let err = storage.set_item("k", &"x".repeat(50)).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 20, .. }));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn test_invalid_key_rejected() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.set_item("../escape", "v"),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
