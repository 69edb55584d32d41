//! Safety guards against the container killing an execution mid-update.
//!
//! Tripping early only costs a reschedule. Tripping late risks the container
//! terminating the unit between an attempt and its state update.

use std::time::Duration;

use crate::config::MemoryLimit;

/// Remaining execution time below which the guard trips.
pub const TIME_THRESHOLD: Duration = Duration::from_secs(10);

/// Remaining memory headroom, as a percentage of the limit, below which the
/// guard trips.
pub const MEMORY_THRESHOLD_PERCENT: u64 = 30;

/// Stateless evaluator of execution-budget exhaustion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// True when fewer than [`TIME_THRESHOLD`] remain of a bounded
    /// `max_execution_secs` budget. A budget of `0` is unlimited.
    pub fn is_approaching_time_limit(
        execution_start_ms: u128,
        now_ms: u128,
        max_execution_secs: u64,
    ) -> bool {
        if max_execution_secs == 0 {
            return false;
        }
        let elapsed_ms = now_ms.saturating_sub(execution_start_ms);
        let budget_ms = u128::from(max_execution_secs) * 1000;
        let remaining_ms = budget_ms.saturating_sub(elapsed_ms);
        remaining_ms < TIME_THRESHOLD.as_millis()
    }

    /// True when the free memory under a bounded `limit` is less than
    /// [`MEMORY_THRESHOLD_PERCENT`] of that limit.
    pub fn is_approaching_memory_limit(limit: MemoryLimit, usage_bytes: u64) -> bool {
        let Some(limit_bytes) = limit.bytes() else {
            return false;
        };
        let headroom = i128::from(limit_bytes) - i128::from(usage_bytes);
        let threshold = i128::from(limit_bytes) * i128::from(MEMORY_THRESHOLD_PERCENT) / 100;
        headroom < threshold
    }
}
