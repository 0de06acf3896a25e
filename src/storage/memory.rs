//! In-memory storage backend.

use rustc_hash::FxHashMap;

use crate::storage::{KeyValueStore, StorageError};

/// Volatile key-value storage, optionally bounded by a byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once keys and values together
    /// would exceed `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());

            let projected = self.used_bytes() - replaced + key.len() + value.len();

            if projected > quota {
                return Err(StorageError::QuotaExceeded {
                    slot: key.to_string(),
                    quota,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let mut store = MemoryStore::new();

        store.set("cart", "[1]")?;
        store.set("cart", "[]")?;

        assert_eq!(store.get("cart")?, Some("[]".to_string()));
        assert_eq!(store.len(), 1);

        Ok(())
    }

    #[test]
    fn get_missing_key_is_none() -> TestResult {
        let store = MemoryStore::new();

        assert_eq!(store.get("products")?, None);
        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let mut store = MemoryStore::with_quota(8);

        let result = store.set("cart", "[1,2,3,4]");

        assert!(
            matches!(result, Err(StorageError::QuotaExceeded { quota: 8, .. })),
            "expected QuotaExceeded, got {result:?}"
        );
        assert!(store.is_empty());
    }

    #[test]
    fn quota_accounts_for_replaced_values() -> TestResult {
        let mut store = MemoryStore::with_quota(10);

        store.set("cart", "[1,2]")?;
        store.set("cart", "[3,4]")?;

        assert_eq!(store.used_bytes(), 9);

        Ok(())
    }
}
