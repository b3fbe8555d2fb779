//! Errors from the seeding run.

use flagseed_core::StoreError;
use thiserror::Error;

/// Any failure that aborts a seeding run.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The store rejected an open or a write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A blocking store task panicked or was cancelled.
    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// The store is still shared with another handle at close.
    #[error("store still in use")]
    InUse,

    /// The report could not be serialized as JSON.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),

    /// The report could not be written (e.g. stdout is a closed pipe).
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),
}

/// Result alias for seeding operations.
pub type Result<T> = std::result::Result<T, SeedError>;
