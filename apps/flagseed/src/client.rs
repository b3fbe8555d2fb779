//! # Flag Client
//!
//! Async handle over a [`FlagStore`].
//!
//! Store calls are blocking (redb fsyncs on commit), so each one runs on
//! tokio's blocking pool. Calls are awaited one at a time; the mutex exists
//! so the store can move into `spawn_blocking` closures.

use crate::error::{Result, SeedError};
use flagseed_core::{FlagRecord, FlagStore, RedbFlagStore};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default store file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "feature_flags.redb";

/// Where the flag store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the redb file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

/// Seconds since the unix epoch, 0 if the clock is before it.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

type WriteHandle = JoinHandle<Result<()>>;

fn log_abandoned(joined: std::result::Result<Result<()>, tokio::task::JoinError>) {
    match joined {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Abandoned flag write failed"),
        Err(e) => warn!(error = %e, "Abandoned flag write did not finish"),
    }
}

/// A spawned write. If the awaiting future is dropped before the write
/// finishes, the handle is parked in the client so `close` can wait on it.
struct InFlight<'a> {
    handle: Option<WriteHandle>,
    parked: &'a Mutex<Option<WriteHandle>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Ok(mut parked) = self.parked.lock() {
                *parked = Some(handle);
            }
        }
    }
}

/// Connection to a flag store, scoped to one run.
///
/// Dropping the client releases the store. [`FlagClient::close`] does the
/// same explicitly and hands the store back.
#[derive(Debug)]
pub struct FlagClient<S> {
    store: Arc<Mutex<S>>,
    abandoned: Mutex<Option<WriteHandle>>,
}

impl FlagClient<RedbFlagStore> {
    /// Open (or create) the redb store described by `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let path = config.path.clone();
        let store = tokio::task::spawn_blocking(move || RedbFlagStore::create(path)).await??;
        info!(path = %store.path().display(), "Connected to flag store");
        Ok(Self::from_store(store))
    }

    /// Close the connection, releasing the database file.
    pub async fn disconnect(self) -> Result<()> {
        let store = self.close().await?;
        let path = store.path().to_path_buf();
        tokio::task::spawn_blocking(move || store.close()).await?;
        info!(path = %path.display(), "Disconnected from flag store");
        Ok(())
    }
}

impl<S> FlagClient<S>
where
    S: FlagStore + Send + 'static,
{
    /// Wrap an already-open store.
    pub fn from_store(store: S) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            abandoned: Mutex::new(None),
        }
    }

    /// Insert or overwrite one flag, stamped with the current time.
    pub async fn set_flag(&self, key: &str, enabled: bool, description: &str) -> Result<()> {
        let store = Arc::clone(&self.store);
        let key = key.to_string();
        let record = FlagRecord::new(enabled, description);
        let updated_at = unix_now();
        self.settle_abandoned().await?;

        let handle = tokio::task::spawn_blocking(move || -> Result<()> {
            let mut store = store.lock().map_err(|_| SeedError::Poisoned)?;
            store.set_flag(&key, &record, updated_at)?;
            debug!(key = %key, enabled, updated_at, "Flag stored");
            Ok(())
        });

        let mut in_flight = InFlight {
            handle: Some(handle),
            parked: &self.abandoned,
        };
        let joined = match in_flight.handle.as_mut() {
            Some(handle) => handle.await,
            None => return Ok(()),
        };
        in_flight.handle = None;
        joined?
    }

    /// Wait for a parked write, so at most one write touches the store.
    async fn settle_abandoned(&self) -> Result<()> {
        let parked = self
            .abandoned
            .lock()
            .map_err(|_| SeedError::Poisoned)?
            .take();
        if let Some(handle) = parked {
            log_abandoned(handle.await);
        }
        Ok(())
    }

    /// End the connection and return the underlying store.
    ///
    /// Waits for a write whose caller stopped awaiting it, since that
    /// write's task still shares the store.
    pub async fn close(self) -> Result<S> {
        let abandoned = self
            .abandoned
            .into_inner()
            .map_err(|_| SeedError::Poisoned)?;
        if let Some(handle) = abandoned {
            log_abandoned(handle.await);
        }

        let store = Arc::try_unwrap(self.store).map_err(|_| SeedError::InUse)?;
        store.into_inner().map_err(|_| SeedError::Poisoned)
    }
}

// =============================================================================
// TESTS
// =============================================================================
