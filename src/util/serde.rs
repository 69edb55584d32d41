//! Serializable identifiers and shared enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-supplied identity of one logical poll, stable across resumptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollingId(String);

impl PollingId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PollingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PollingId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PollingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&Self> for PollingId {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for PollingId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PollingId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// How a poll was handed back to the work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseMode {
    /// The container released the current unit with a visibility delay.
    Inline,
    /// A fresh equivalent unit was built and submitted to the queue.
    Resubmit,
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => f.write_str("inline"),
            Self::Resubmit => f.write_str("resubmit"),
        }
    }
}
