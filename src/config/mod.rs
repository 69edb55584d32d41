//! Configuration models for poll types and execution limits.

pub mod limits;
pub mod poll;

pub use limits::{ExecutionLimits, MemoryLimit};
pub use poll::{PollConfig, PollerConfig};
