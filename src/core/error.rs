//! Error types for polling operations.

use thiserror::Error;

/// Errors produced by the polling core and its collaborators.
#[derive(Debug, Error)]
pub enum PollError {
    /// Durable store failure (read, write, or existence check).
    #[error("store error: {0}")]
    Store(String),
    /// The enqueue mechanism rejected or failed a submission.
    #[error("enqueue error: {0}")]
    Enqueue(String),
    /// The execution container could not release the current unit.
    #[error("release error: {0}")]
    Release(String),
    /// A memory limit string could not be parsed.
    #[error("invalid memory limit: {0}")]
    InvalidMemoryLimit(String),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The domain collaborator raised a fault during a check or attempt.
    #[error("poll attempt failed: {0}")]
    Attempt(#[source] anyhow::Error),
}

/// Application-facing result using anyhow for domain collaborator callbacks.
pub type AppResult<T> = Result<T, anyhow::Error>;
