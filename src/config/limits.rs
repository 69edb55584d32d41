//! Execution limits reported by the container at invocation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::PollError;

/// Memory budget of the current execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryLimit {
    /// No memory ceiling (`-1` in human form).
    #[default]
    Unlimited,
    /// Ceiling in bytes.
    Bytes(u64),
}

impl MemoryLimit {
    /// Parse a human-readable limit such as `"128M"`, `"1G"`, `"512"` or `"-1"`.
    ///
    /// A trailing `K`, `M` or `G` (either case) multiplies the numeric prefix
    /// by 1024, 1024² or 1024³. No suffix means bytes.
    pub fn parse(input: &str) -> Result<Self, PollError> {
        let raw = input.trim();
        if raw == "-1" {
            return Ok(Self::Unlimited);
        }

        let (digits, multiplier) = match raw.chars().last() {
            Some('k' | 'K') => (&raw[..raw.len() - 1], 1024_u64),
            Some('m' | 'M') => (&raw[..raw.len() - 1], 1024 * 1024),
            Some('g' | 'G') => (&raw[..raw.len() - 1], 1024 * 1024 * 1024),
            Some(_) => (raw, 1),
            None => return Err(PollError::InvalidMemoryLimit("empty".into())),
        };

        let value: u64 = digits
            .trim()
            .parse()
            .map_err(|_| PollError::InvalidMemoryLimit(input.to_string()))?;
        value
            .checked_mul(multiplier)
            .map(Self::Bytes)
            .ok_or_else(|| PollError::InvalidMemoryLimit(format!("{input} overflows")))
    }

    /// Ceiling in bytes, or `None` when unlimited.
    pub const fn bytes(self) -> Option<u64> {
        match self {
            Self::Unlimited => None,
            Self::Bytes(b) => Some(b),
        }
    }
}

impl FromStr for MemoryLimit {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MemoryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("-1"),
            Self::Bytes(b) => write!(f, "{b}"),
        }
    }
}

/// Time and memory budgets injected by the execution container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionLimits {
    /// Wall-clock budget of one execution in seconds; `0` means unlimited.
    pub max_execution_secs: u64,
    /// Memory budget of the surrounding process.
    pub memory_limit: MemoryLimit,
}

impl ExecutionLimits {
    /// Limits with neither a time nor a memory ceiling.
    pub const fn unlimited() -> Self {
        Self {
            max_execution_secs: 0,
            memory_limit: MemoryLimit::Unlimited,
        }
    }

    /// Set the execution time budget.
    #[must_use]
    pub const fn with_max_execution_secs(mut self, secs: u64) -> Self {
        self.max_execution_secs = secs;
        self
    }

    /// Set the memory budget.
    #[must_use]
    pub const fn with_memory_limit(mut self, limit: MemoryLimit) -> Self {
        self.memory_limit = limit;
        self
    }
}
