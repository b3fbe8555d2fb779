//! # Storage Module
//!
//! Disk-backed flag storage using redb.
//!
//! Uses redb embedded database for:
//! - ACID transactions (one committed transaction per flag write)
//! - Crash safety (copy-on-write B-trees)
//! - Single-file layout, no server process

mod redb_flags;

pub use redb_flags::{FLAGS_TABLE, RedbFlagStore};
