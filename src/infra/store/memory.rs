//! In-memory state store.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::core::{PollError, StateStore};

/// Process-local store for development, tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove a key, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.write().remove(key)
    }
}

impl StateStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PollError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<(), PollError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, PollError> {
        Ok(self.entries.read().contains_key(key))
    }

    fn put_if_absent(&self, key: &str, value: Value) -> Result<Value, PollError> {
        let mut entries = self.entries.write();
        Ok(entries.entry(key.to_string()).or_insert(value).clone())
    }
}
