//! In-process execution container.

use std::sync::Arc;
use std::time::Duration;

use memory_stats::memory_stats;
use parking_lot::Mutex;

use crate::config::ExecutionLimits;
use crate::core::{ExecutionContainer, PollError};
use crate::util::clock::{Clock, SystemClock};

type MemoryProbe = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Execution container for units run inside the current process.
///
/// A release request is recorded rather than acted on; whoever drives the
/// container (see [`crate::runtime::Dispatcher`]) takes it with
/// [`LocalContainer::take_release`] and re-queues the unit.
pub struct LocalContainer<K = SystemClock> {
    clock: K,
    limits: ExecutionLimits,
    memory_probe: MemoryProbe,
    released: Mutex<Option<Duration>>,
}

impl LocalContainer<SystemClock> {
    /// Container on the system clock with the given limits.
    pub fn new(limits: ExecutionLimits) -> Self {
        Self::with_clock(SystemClock, limits)
    }
}

impl<K: Clock> LocalContainer<K> {
    /// Container on a custom clock.
    pub fn with_clock(clock: K, limits: ExecutionLimits) -> Self {
        Self {
            clock,
            limits,
            memory_probe: Arc::new(process_memory_bytes),
            released: Mutex::new(None),
        }
    }

    /// Replace the memory usage source.
    #[must_use]
    pub fn with_memory_probe(mut self, probe: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.memory_probe = Arc::new(probe);
        self
    }

    /// Clock driving this container.
    pub const fn clock(&self) -> &K {
        &self.clock
    }

    /// Take the pending release delay, if the current unit asked for one.
    pub fn take_release(&self) -> Option<Duration> {
        self.released.lock().take()
    }
}

impl<K: Clock> ExecutionContainer for LocalContainer<K> {
    fn now_ms(&self) -> u128 {
        self.clock.now_ms()
    }

    fn limits(&self) -> ExecutionLimits {
        self.limits
    }

    fn memory_usage_bytes(&self) -> u64 {
        (self.memory_probe)()
    }

    fn release(&self, delay: Duration) -> Result<(), PollError> {
        let mut released = self.released.lock();
        if released.is_some() {
            return Err(PollError::Release("current unit already released".into()));
        }
        *released = Some(delay);
        Ok(())
    }

    fn sleep(&self, duration: Duration) {
        self.clock.sleep(duration);
    }
}

/// Resident set size of the current process in bytes.
///
/// Reports 0 when the platform exposes no figure, which leaves the memory
/// guard untripped.
pub fn process_memory_bytes() -> u64 {
    memory_stats().map_or(0, |stats| u64::try_from(stats.physical_mem).unwrap_or(u64::MAX))
}
