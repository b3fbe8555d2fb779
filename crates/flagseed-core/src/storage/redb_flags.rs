//! redb-backed [`FlagStore`].
//!
//! Layout: one table, `feature_flags`, mapping the flag key to a
//! postcard-encoded [`FlagEntry`].

use crate::flag::{FlagEntry, FlagRecord, validate_key};
use crate::store::{FlagStore, StoreError};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::{Path, PathBuf};

/// Table holding every flag.
pub const FLAGS_TABLE: TableDefinition<'static, &str, &[u8]> =
    TableDefinition::new("feature_flags");

fn db_err(e: impl Into<redb::Error>) -> StoreError {
    StoreError::Database(e.into())
}

/// Flag store persisted in a single redb file.
pub struct RedbFlagStore {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for RedbFlagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbFlagStore")
            .field("path", &self.path)
            .finish()
    }
}

impl RedbFlagStore {
    /// Open the store at `path`, creating the file and table if missing.
    ///
    /// Fails if the parent directory does not exist or the file is held
    /// open by another handle.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path).map_err(db_err)?;

        // Make sure reads never see a missing table.
        let txn = db.begin_write().map_err(db_err)?;
        txn.open_table(FLAGS_TABLE).map_err(db_err)?;
        txn.commit().map_err(db_err)?;

        Ok(Self { db, path })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the database handle.
    pub fn close(self) {
        drop(self.db);
    }
}

impl FlagStore for RedbFlagStore {
    fn set_flag(
        &mut self,
        key: &str,
        record: &FlagRecord,
        updated_at: u64,
    ) -> Result<(), StoreError> {
        validate_key(key)?;
        let bytes = postcard::to_allocvec(&FlagEntry {
            record: record.clone(),
            updated_at,
        })?;

        let txn = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = txn.open_table(FLAGS_TABLE).map_err(db_err)?;
            table.insert(key, bytes.as_slice()).map_err(db_err)?;
        }
        txn.commit().map_err(db_err)?;
        Ok(())
    }

    fn get_flag(&self, key: &str) -> Result<Option<FlagEntry>, StoreError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(FLAGS_TABLE).map_err(db_err)?;
        match table.get(key).map_err(db_err)? {
            Some(guard) => Ok(Some(postcard::from_bytes(guard.value())?)),
            None => Ok(None),
        }
    }

    fn flag_keys(&self) -> Result<Vec<String>, StoreError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(FLAGS_TABLE).map_err(db_err)?;
        let mut keys = Vec::new();
        for item in table.iter().map_err(db_err)? {
            let (key, _) = item.map_err(db_err)?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }

    fn flag_count(&self) -> Result<usize, StoreError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(FLAGS_TABLE).map_err(db_err)?;
        let len = table.len().map_err(db_err)?;
        Ok(len as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================
