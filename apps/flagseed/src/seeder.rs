//! # Flag Seeder
//!
//! Writes a flag table into the store, one flag at a time, in table order.
//!
//! The first failed write aborts the run. There is no retry and no rollback:
//! flags written before the failure stay written.

use crate::client::{FlagClient, StoreConfig};
use crate::error::Result;
use flagseed_core::{DEFAULT_FLAGS, FlagDefinition, FlagStore, RedbFlagStore};
use serde::Serialize;
use tracing::{info, warn};

/// Settings for one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedConfig {
    /// Store to seed.
    pub store: StoreConfig,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Keys written, in write order.
    pub keys: Vec<String>,
}

impl SeedReport {
    /// Number of flags written.
    #[must_use]
    pub fn count(&self) -> usize {
        self.keys.len()
    }
}

/// Upsert every flag in `flags` through `client`.
pub async fn seed_flags<S>(client: &FlagClient<S>, flags: &[FlagDefinition]) -> Result<SeedReport>
where
    S: FlagStore + Send + 'static,
{
    info!("Initializing feature flags...");
    let mut keys = Vec::with_capacity(flags.len());
    for def in flags {
        client.set_flag(def.key, def.enabled, def.description).await?;
        keys.push(def.key.to_string());
    }
    info!(count = keys.len(), "Feature flags initialized successfully.");
    Ok(SeedReport { keys })
}

/// Connect, seed [`DEFAULT_FLAGS`], disconnect.
pub async fn run(config: &SeedConfig) -> Result<SeedReport> {
    let client = FlagClient::connect(&config.store).await?;
    run_with(client, &DEFAULT_FLAGS).await
}

/// Seed `flags` through an open client, then disconnect it.
///
/// The store is closed whether or not seeding succeeded. A seeding error
/// takes precedence over a close error.
pub async fn run_with(
    client: FlagClient<RedbFlagStore>,
    flags: &[FlagDefinition],
) -> Result<SeedReport> {
    let seeded = seed_flags(&client, flags).await;
    let closed = client.disconnect().await;

    match (seeded, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close flag store after seeding error");
            }
            Err(e)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SeedError;
    use flagseed_core::{FlagEntry, FlagRecord, MemoryFlagStore, StoreError};

    /// Store that fails every write after the first `allow` writes.
    #[derive(Debug, Default)]
    struct FailingStore {
        inner: MemoryFlagStore,
        allow: usize,
    }

    impl FlagStore for FailingStore {
        fn set_flag(
            &mut self,
            key: &str,
            record: &FlagRecord,
            updated_at: u64,
        ) -> std::result::Result<(), StoreError> {
            if self.inner.flag_count()? >= self.allow {
                let io = std::io::Error::other("disk full");
                return Err(StoreError::Database(redb::Error::Io(io)));
            }
            self.inner.set_flag(key, record, updated_at)
        }

        fn get_flag(&self, key: &str) -> std::result::Result<Option<FlagEntry>, StoreError> {
            self.inner.get_flag(key)
        }

        fn flag_keys(&self) -> std::result::Result<Vec<String>, StoreError> {
            self.inner.flag_keys()
        }
    }

    #[tokio::test]
    async fn seeds_in_table_order() {
        let client = FlagClient::from_store(MemoryFlagStore::new());
        let report = seed_flags(&client, &DEFAULT_FLAGS).await.unwrap();

        let expected: Vec<_> = DEFAULT_FLAGS.iter().map(|d| d.key.to_string()).collect();
        assert_eq!(report.keys, expected);
        assert_eq!(report.count(), 9);
    }

    #[tokio::test]
    async fn empty_table_writes_nothing() {
        let client = FlagClient::from_store(MemoryFlagStore::new());
        let report = seed_flags(&client, &[]).await.unwrap();
        assert_eq!(report.count(), 0);
        assert_eq!(client.close().await.unwrap().flag_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let client = FlagClient::from_store(FailingStore {
            allow: 3,
            ..FailingStore::default()
        });
        let result = seed_flags(&client, &DEFAULT_FLAGS).await;
        assert!(matches!(
            result,
            Err(SeedError::Store(StoreError::Database(redb::Error::Io(_))))
        ));

        let store = client.close().await.unwrap();
        assert_eq!(
            store.flag_keys().unwrap(),
            ["custom_agents", "mcp_module", "templates_api"]
        );
    }
}
