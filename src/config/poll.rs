//! Per-poll-type configuration.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::PollError;

const DEFAULT_MAX_ATTEMPTS: u32 = 200;
const DEFAULT_LIFETIME_SECS: u64 = 600;
const DEFAULT_INTERVAL_SECS: u64 = 3;

/// Limits and release behaviour for one poll type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Failed attempts allowed before the poll gives up.
    pub max_attempts: u32,
    /// Maximum age of the logical poll, measured from its first execution.
    pub lifetime_secs: u64,
    /// Delay between inline attempts and before a rescheduled resumption.
    pub interval_secs: u64,
    /// Whether the container can release the current unit for deferred
    /// resumption instead of requiring a new unit to be enqueued.
    pub supports_inline_release: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lifetime_secs: DEFAULT_LIFETIME_SECS,
            interval_secs: DEFAULT_INTERVAL_SECS,
            supports_inline_release: true,
        }
    }
}

impl PollConfig {
    /// Configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of failed attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the poll lifetime in seconds.
    #[must_use]
    pub const fn with_lifetime_secs(mut self, lifetime_secs: u64) -> Self {
        self.lifetime_secs = lifetime_secs;
        self
    }

    /// Set the attempt interval in seconds.
    #[must_use]
    pub const fn with_interval_secs(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Choose between in-place release and resubmission.
    #[must_use]
    pub const fn with_inline_release(mut self, supported: bool) -> Self {
        self.supports_inline_release = supported;
        self
    }

    /// Attempt interval as a `Duration`.
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Poll lifetime as a `Duration`.
    pub const fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), PollError> {
        if self.max_attempts == 0 {
            return Err(PollError::InvalidConfig(
                "max_attempts must be greater than 0".into(),
            ));
        }
        if self.lifetime_secs == 0 {
            return Err(PollError::InvalidConfig(
                "lifetime_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse a single poll configuration from JSON and validate it.
    pub fn from_json_str(input: &str) -> Result<Self, PollError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| PollError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the environment, loading `.env` if present.
    ///
    /// Reads `POLL_MAX_ATTEMPTS`, `POLL_LIFETIME_SECS`, `POLL_INTERVAL_SECS`
    /// and `POLL_SUPPORTS_INLINE_RELEASE`; unset variables keep defaults.
    pub fn from_env() -> Result<Self, PollError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        let cfg = Self {
            max_attempts: env_or("POLL_MAX_ATTEMPTS", defaults.max_attempts)?,
            lifetime_secs: env_or("POLL_LIFETIME_SECS", defaults.lifetime_secs)?,
            interval_secs: env_or("POLL_INTERVAL_SECS", defaults.interval_secs)?,
            supports_inline_release: env_or(
                "POLL_SUPPORTS_INLINE_RELEASE",
                defaults.supports_inline_release,
            )?,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, PollError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| PollError::InvalidConfig(format!("{key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Root configuration: poll type name to its settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Map of poll type to configuration.
    #[serde(default)]
    pub polls: HashMap<String, PollConfig>,
}

impl PollerConfig {
    /// Validate every configured poll type.
    pub fn validate(&self) -> Result<(), PollError> {
        for (name, poll) in &self.polls {
            poll.validate().map_err(|e| {
                PollError::InvalidConfig(format!("poll type `{name}` invalid: {e}"))
            })?;
        }
        Ok(())
    }

    /// Parse the root configuration from JSON and validate.
    pub fn from_json_str(input: &str) -> Result<Self, PollError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| PollError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Settings for a poll type, or defaults when it is not configured.
    pub fn for_poll_type(&self, poll_type: &str) -> PollConfig {
        self.polls.get(poll_type).cloned().unwrap_or_default()
    }
}
