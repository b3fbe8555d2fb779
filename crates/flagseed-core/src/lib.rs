//! # Flagseed Core
//!
//! Feature flag records and the stores that persist them.
//!
//! This crate is synchronous and never reads the wall clock. The
//! `flagseed` binary owns the async runtime and supplies write timestamps.
//!
//! ## Layout
//!
//! - [`flag`]: flag records, key validation, the default flag table
//! - [`store`]: the [`FlagStore`] trait and the in-memory store
//! - [`storage`]: the redb-backed store

pub mod flag;
pub mod storage;
pub mod store;

pub use flag::{DEFAULT_FLAGS, FlagDefinition, FlagEntry, FlagError, FlagRecord, validate_key};
pub use storage::RedbFlagStore;
pub use store::{FlagStore, MemoryFlagStore, StoreError};
