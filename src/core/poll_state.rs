//! Durable progress of a logical poll across executions.

use std::sync::Arc;

use serde_json::Value;

use crate::core::PollError;
use crate::util::serde::PollingId;

/// Durable key-value store holding cross-execution counters.
///
/// Backends must make [`StateStore::put_if_absent`] atomic per key when more
/// than one process can touch the same poll; the default implementation is
/// only as atomic as the `has`/`get`/`put` sequence allows.
pub trait StateStore {
    /// Fetch a value, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Value>, PollError>;

    /// Store a value, replacing any previous one.
    fn put(&self, key: &str, value: Value) -> Result<(), PollError>;

    /// Whether a value exists under `key`.
    fn has(&self, key: &str) -> Result<bool, PollError>;

    /// Store `value` only if `key` is absent. Returns whichever value is
    /// stored afterwards.
    fn put_if_absent(&self, key: &str, value: Value) -> Result<Value, PollError> {
        if self.has(key)? {
            if let Some(existing) = self.get(key)? {
                return Ok(existing);
            }
        }
        self.put(key, value.clone())?;
        Ok(value)
    }
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn get(&self, key: &str) -> Result<Option<Value>, PollError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Value) -> Result<(), PollError> {
        (**self).put(key, value)
    }

    fn has(&self, key: &str) -> Result<bool, PollError> {
        (**self).has(key)
    }

    fn put_if_absent(&self, key: &str, value: Value) -> Result<Value, PollError> {
        (**self).put_if_absent(key, value)
    }
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, PollError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Value) -> Result<(), PollError> {
        (**self).put(key, value)
    }

    fn has(&self, key: &str) -> Result<bool, PollError> {
        (**self).has(key)
    }

    fn put_if_absent(&self, key: &str, value: Value) -> Result<Value, PollError> {
        (**self).put_if_absent(key, value)
    }
}

/// Attempt counter and start time of one logical poll.
///
/// Entries are created lazily on first access and never deleted here;
/// expiring stale polls is the store's concern.
pub struct PollState<S> {
    store: S,
    namespace: String,
}

impl<S: StateStore> PollState<S> {
    /// Bind the state of `polling_id` under the `poll_type` namespace.
    pub fn new(store: S, poll_type: &str, polling_id: impl Into<PollingId>) -> Self {
        let polling_id = polling_id.into();
        Self {
            store,
            namespace: format!("{poll_type}:{polling_id}"),
        }
    }

    /// Key prefix shared by every counter of this poll.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, field: &str) -> String {
        format!("{}:{field}", self.namespace)
    }

    /// Number of failed attempts recorded so far, 0 when absent.
    pub fn get_attempts(&self) -> Result<u32, PollError> {
        let key = self.key("attempts");
        match self.store.get(&key)? {
            None => Ok(0),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| PollError::Store(format!("`{key}` is not a counter: {value}"))),
        }
    }

    /// Record one more failed attempt and return the new count.
    ///
    /// Read-modify-write; relies on at most one active execution per poll.
    pub fn increment_attempts(&self) -> Result<u32, PollError> {
        let next = self.get_attempts()?.saturating_add(1);
        self.store.put(&self.key("attempts"), Value::from(next))?;
        Ok(next)
    }

    /// Start time of the logical poll in milliseconds since the epoch.
    ///
    /// The first caller stores `now_ms`; later callers get that value back.
    pub fn get_started_at(&self, now_ms: u128) -> Result<u128, PollError> {
        let key = self.key("started_at");
        let now = u64::try_from(now_ms).unwrap_or(u64::MAX);
        let stored = self.store.put_if_absent(&key, Value::from(now))?;
        stored
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| PollError::Store(format!("`{key}` is not a timestamp: {stored}")))
    }
}
