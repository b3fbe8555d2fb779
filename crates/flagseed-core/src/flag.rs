//! # Flag Module
//!
//! Flag records and the static table of flags seeded on every run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// KEY RULES
// =============================================================================

/// Maximum length of a flag key in bytes.
pub const MAX_KEY_LEN: usize = 64;

/// Errors from flag key validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The key is the empty string.
    #[error("flag key is empty")]
    EmptyKey,

    /// The key exceeds [`MAX_KEY_LEN`] bytes.
    #[error("flag key is {len} bytes, limit is {}", MAX_KEY_LEN)]
    KeyTooLong {
        /// Actual length in bytes.
        len: usize,
    },

    /// The key contains a character outside `[a-z0-9_]`.
    #[error("flag key {key:?} contains invalid character {ch:?}")]
    InvalidKeyChar {
        /// The offending key.
        key: String,
        /// The first invalid character.
        ch: char,
    },
}

/// Check that a key is a non-empty identifier of `[a-z0-9_]`.
pub fn validate_key(key: &str) -> Result<(), FlagError> {
    if key.is_empty() {
        return Err(FlagError::EmptyKey);
    }
    if key.len() > MAX_KEY_LEN {
        return Err(FlagError::KeyTooLong { len: key.len() });
    }
    if let Some(ch) = key
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
    {
        return Err(FlagError::InvalidKeyChar {
            key: key.to_string(),
            ch,
        });
    }
    Ok(())
}

// =============================================================================
// RECORDS
// =============================================================================

/// The value stored under a flag key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRecord {
    /// Whether the feature is switched on.
    pub enabled: bool,
    /// Human-readable description.
    pub description: String,
}

impl FlagRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(enabled: bool, description: impl Into<String>) -> Self {
        Self {
            enabled,
            description: description.into(),
        }
    }
}

/// A record as kept by a store, stamped with its last write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagEntry {
    /// The flag value.
    pub record: FlagRecord,
    /// Unix seconds of the last write, as supplied by the writer.
    pub updated_at: u64,
}

/// One row of a compile-time flag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDefinition {
    /// Store key.
    pub key: &'static str,
    /// Value written for `enabled`.
    pub enabled: bool,
    /// Value written for `description`.
    pub description: &'static str,
}

impl FlagDefinition {
    const fn on(key: &'static str, description: &'static str) -> Self {
        Self {
            key,
            enabled: true,
            description,
        }
    }

    /// The record this definition writes.
    #[must_use]
    pub fn record(&self) -> FlagRecord {
        FlagRecord::new(self.enabled, self.description)
    }
}

// =============================================================================
// DEFAULT TABLE
// =============================================================================

/// Flags written by `flagseed`, in write order.
pub const DEFAULT_FLAGS: [FlagDefinition; 9] = [
    FlagDefinition::on("custom_agents", "Custom agents feature flag"),
    FlagDefinition::on("mcp_module", "MCP module feature flag"),
    FlagDefinition::on("templates_api", "Templates API feature flag"),
    FlagDefinition::on("triggers_api", "Triggers API feature flag"),
    FlagDefinition::on("workflows_api", "Workflows API feature flag"),
    FlagDefinition::on("knowledge_base", "Knowledge base feature flag"),
    FlagDefinition::on("pipedream", "Pipedream integration feature flag"),
    FlagDefinition::on("credentials_api", "Credentials API feature flag"),
    FlagDefinition::on("suna_default_agent", "Suna default agent feature flag"),
];

// =============================================================================
// TESTS
// =============================================================================
