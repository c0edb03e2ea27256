//! The persistent key-value store the session mirrors itself into.
//!
//! The store never originates state: it only echoes confirmed mutations.
//! Reads degrade gracefully: a missing or corrupt value decodes to the
//! documented default for its key, with a warning, so a damaged store can
//! never prevent a session from starting.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::alias::AliasRegistry;
use crate::category::CategoryStore;
use crate::error::Result;
use crate::history::CommandHistory;
use crate::stats::CommandFrequency;

/// The fixed storage keys.
pub mod keys {
    pub const AUTH: &str = "terminalAuth";
    pub const SESSION_START: &str = "terminalSessionStart";
    pub const COMMAND_COUNT: &str = "terminalCommandCount";
    pub const COMMAND_FREQUENCY: &str = "terminalCommandFrequency";
    pub const COMMAND_HISTORY: &str = "terminalCommandHistory";
    pub const ALIASES: &str = "terminalAliases";
    pub const DATA: &str = "terminalData";
}

/// A durable string key-value store under the fixed keys above.
///
/// All operations are synchronous from the session's perspective.
pub trait KeyValueStore: Send {
    /// Returns the raw stored value, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a raw value under a key.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes a key, succeeding even if it was absent.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Lists every stored key.
    fn keys(&self) -> Vec<String>;
}

/// In-memory store, used by tests and as a stand-in when no directory is
/// available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: std::collections::BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

// ============================================================================
// Typed loads: corrupt or missing values decode to the documented default.
// ============================================================================

/// `terminalAuth` is the literal string "true" or absent.
pub fn load_auth(store: &dyn KeyValueStore) -> bool {
    store.get(keys::AUTH).as_deref() == Some("true")
}

/// `terminalSessionStart` is a raw RFC 3339 timestamp string.
pub fn load_session_start(store: &dyn KeyValueStore) -> Option<DateTime<Utc>> {
    let raw = store.get(keys::SESSION_START)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            warn!(key = keys::SESSION_START, %err, "discarding corrupt value");
            None
        }
    }
}

/// `terminalCommandCount` is a raw decimal integer string.
pub fn load_command_count(store: &dyn KeyValueStore) -> u64 {
    let Some(raw) = store.get(keys::COMMAND_COUNT) else {
        return 0;
    };
    match raw.trim().parse() {
        Ok(count) => count,
        Err(err) => {
            warn!(key = keys::COMMAND_COUNT, %err, "discarding corrupt value");
            0
        }
    }
}

pub fn load_frequency(store: &dyn KeyValueStore) -> CommandFrequency {
    load_json(store, keys::COMMAND_FREQUENCY)
}

pub fn load_history(store: &dyn KeyValueStore) -> CommandHistory {
    load_json(store, keys::COMMAND_HISTORY)
}

pub fn load_aliases(store: &dyn KeyValueStore) -> AliasRegistry {
    load_json(store, keys::ALIASES)
}

pub fn load_categories(store: &dyn KeyValueStore) -> CategoryStore {
    load_json(store, keys::DATA)
}

fn load_json<T: serde::de::DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    let Some(raw) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, %err, "discarding corrupt value");
            T::default()
        }
    }
}

// ============================================================================
// Mirrors: best-effort writes, logged on failure, never surfaced.
// ============================================================================

/// Sets or clears the persisted auth flag.
pub fn persist_auth(store: &mut dyn KeyValueStore, authenticated: bool) {
    let result = if authenticated {
        store.set(keys::AUTH, "true")
    } else {
        store.remove(keys::AUTH)
    };
    if let Err(err) = result {
        warn!(key = keys::AUTH, %err, "failed to mirror value");
    }
}

pub fn persist_session_start(store: &mut dyn KeyValueStore, start: DateTime<Utc>) {
    if let Err(err) = store.set(keys::SESSION_START, &start.to_rfc3339()) {
        warn!(key = keys::SESSION_START, %err, "failed to mirror value");
    }
}

pub fn persist_command_count(store: &mut dyn KeyValueStore, count: u64) {
    if let Err(err) = store.set(keys::COMMAND_COUNT, &count.to_string()) {
        warn!(key = keys::COMMAND_COUNT, %err, "failed to mirror value");
    }
}

pub fn persist_frequency(store: &mut dyn KeyValueStore, frequency: &CommandFrequency) {
    persist_json(store, keys::COMMAND_FREQUENCY, frequency);
}

pub fn persist_history(store: &mut dyn KeyValueStore, history: &CommandHistory) {
    persist_json(store, keys::COMMAND_HISTORY, history);
}

pub fn persist_aliases(store: &mut dyn KeyValueStore, aliases: &AliasRegistry) {
    persist_json(store, keys::ALIASES, aliases);
}

pub fn persist_categories(store: &mut dyn KeyValueStore, categories: &CategoryStore) {
    persist_json(store, keys::DATA, categories);
}

fn persist_json<T: serde::Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(encoded) => {
            if let Err(err) = store.set(key, &encoded) {
                warn!(key, %err, "failed to mirror value");
            }
        }
        Err(err) => warn!(key, %err, "failed to encode value"),
    }
}
