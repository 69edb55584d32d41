//! Collaborator contracts at the edge of the polling core.
//!
//! The core never owns a worker process, a queue, or the domain check. It
//! consumes them through three seams:
//!
//! - [`ExecutionContainer`]: the thing currently running the unit of work.
//!   It knows the time, the budgets of this execution, and how to put the
//!   current unit back on its queue.
//! - [`UnitQueue`]: the enqueue mechanism used when a brand-new unit has to
//!   be submitted instead.
//! - [`PollingJob`]: the domain collaborator implemented by each concrete
//!   poll type.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ExecutionLimits;
use crate::core::{AppResult, PollError};
use crate::util::serde::PollingId;

/// Execution container running the current unit of work.
pub trait ExecutionContainer {
    /// Current wall-clock time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u128;

    /// Budgets of the current execution.
    fn limits(&self) -> ExecutionLimits;

    /// Memory currently used by the surrounding process, in bytes.
    fn memory_usage_bytes(&self) -> u64;

    /// Release the current unit back onto its queue, visible again after `delay`.
    ///
    /// The unit keeps its identity and any framework-level retry counters.
    fn release(&self, delay: Duration) -> Result<(), PollError>;

    /// Suspend the current execution. The unit keeps its slot meanwhile.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Enqueue mechanism that schedules a unit for delayed execution.
pub trait UnitQueue<U> {
    /// Submit `unit`, to become runnable after `delay`.
    fn submit(&self, unit: U, delay: Duration) -> Result<(), PollError>;
}

/// Domain collaborator implemented by every concrete poll type.
pub trait PollingJob {
    /// Successor unit type built for the resubmission path.
    type Unit;

    /// Identifier unique to this logical poll and stable across resumptions.
    fn polling_id(&self) -> PollingId;

    /// Namespace for stored counters. Defaults to the Rust type name.
    fn poll_type(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Whether the external condition has already resolved.
    fn has_poll_resolved(&self) -> AppResult<bool>;

    /// Perform one attempt; returns `true` when it resolved the poll.
    fn resolve_poll(&mut self) -> AppResult<bool>;

    /// Build a unit equivalent to the current one, for resubmission.
    fn resolve_polling_job(&self) -> AppResult<Self::Unit>;
}

impl<C: ExecutionContainer + ?Sized> ExecutionContainer for &C {
    fn now_ms(&self) -> u128 {
        (**self).now_ms()
    }

    fn limits(&self) -> ExecutionLimits {
        (**self).limits()
    }

    fn memory_usage_bytes(&self) -> u64 {
        (**self).memory_usage_bytes()
    }

    fn release(&self, delay: Duration) -> Result<(), PollError> {
        (**self).release(delay)
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

impl<C: ExecutionContainer + ?Sized> ExecutionContainer for Arc<C> {
    fn now_ms(&self) -> u128 {
        (**self).now_ms()
    }

    fn limits(&self) -> ExecutionLimits {
        (**self).limits()
    }

    fn memory_usage_bytes(&self) -> u64 {
        (**self).memory_usage_bytes()
    }

    fn release(&self, delay: Duration) -> Result<(), PollError> {
        (**self).release(delay)
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

impl<U, Q: UnitQueue<U> + ?Sized> UnitQueue<U> for &Q {
    fn submit(&self, unit: U, delay: Duration) -> Result<(), PollError> {
        (**self).submit(unit, delay)
    }
}

impl<U, Q: UnitQueue<U> + ?Sized> UnitQueue<U> for Arc<Q> {
    fn submit(&self, unit: U, delay: Duration) -> Result<(), PollError> {
        (**self).submit(unit, delay)
    }
}
