//! # Store Module
//!
//! The `FlagStore` trait and an in-memory implementation.
//!
//! Every store has the same write semantics: `set_flag` is an upsert keyed
//! by the flag key. Writing the same record twice leaves one entry.

use crate::flag::{FlagEntry, FlagError, FlagRecord, validate_key};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from flag stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database failed (open, transaction, table, commit).
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    /// A stored value could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),

    /// The key was rejected before reaching the store.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] FlagError),
}

// =============================================================================
// FLAGSTORE TRAIT
// =============================================================================

/// A persistent map from flag key to [`FlagEntry`].
pub trait FlagStore {
    /// Insert or overwrite the flag stored under `key`.
    fn set_flag(
        &mut self,
        key: &str,
        record: &FlagRecord,
        updated_at: u64,
    ) -> Result<(), StoreError>;

    /// Look up a flag. Returns `None` if the key was never written.
    fn get_flag(&self, key: &str) -> Result<Option<FlagEntry>, StoreError>;

    /// All keys present, sorted.
    fn flag_keys(&self) -> Result<Vec<String>, StoreError>;

    /// Number of flags stored.
    fn flag_count(&self) -> Result<usize, StoreError> {
        Ok(self.flag_keys()?.len())
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Flag store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    flags: BTreeMap<String, FlagEntry>,
}

impl MemoryFlagStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record, ignoring write times.
    #[must_use]
    pub fn records(&self) -> BTreeMap<String, FlagRecord> {
        self.flags
            .iter()
            .map(|(k, e)| (k.clone(), e.record.clone()))
            .collect()
    }
}

impl FlagStore for MemoryFlagStore {
    fn set_flag(
        &mut self,
        key: &str,
        record: &FlagRecord,
        updated_at: u64,
    ) -> Result<(), StoreError> {
        validate_key(key)?;
        self.flags.insert(
            key.to_string(),
            FlagEntry {
                record: record.clone(),
                updated_at,
            },
        );
        Ok(())
    }

    fn get_flag(&self, key: &str) -> Result<Option<FlagEntry>, StoreError> {
        Ok(self.flags.get(key).cloned())
    }

    fn flag_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.flags.keys().cloned().collect())
    }

    fn flag_count(&self) -> Result<usize, StoreError> {
        Ok(self.flags.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut store = MemoryFlagStore::new();
        let record = FlagRecord::new(true, "Custom agents feature flag");
        store.set_flag("custom_agents", &record, 10).unwrap();

        let entry = store.get_flag("custom_agents").unwrap().unwrap();
        assert_eq!(entry.record, record);
        assert_eq!(entry.updated_at, 10);
        assert!(store.get_flag("missing").unwrap().is_none());
    }

    #[test]
    fn set_overwrites() {
        let mut store = MemoryFlagStore::new();
        store
            .set_flag("pipedream", &FlagRecord::new(false, "old"), 1)
            .unwrap();
        store
            .set_flag("pipedream", &FlagRecord::new(true, "new"), 2)
            .unwrap();

        assert_eq!(store.flag_count().unwrap(), 1);
        let entry = store.get_flag("pipedream").unwrap().unwrap();
        assert_eq!(entry.record, FlagRecord::new(true, "new"));
        assert_eq!(entry.updated_at, 2);
    }

    #[test]
    fn keys_are_sorted() {
        let mut store = MemoryFlagStore::new();
        let record = FlagRecord::new(true, "x");
        for key in ["b", "c", "a"] {
            store.set_flag(key, &record, 0).unwrap();
        }
        assert_eq!(store.flag_keys().unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn invalid_key_is_rejected() {
        let mut store = MemoryFlagStore::new();
        let result = store.set_flag("", &FlagRecord::new(true, "x"), 0);
        assert!(matches!(result, Err(StoreError::InvalidKey(FlagError::EmptyKey))));
        assert_eq!(store.flag_count().unwrap(), 0);
    }
}
