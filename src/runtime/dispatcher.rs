//! Drives due units from a [`DelayQueue`] through a [`PollRunner`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::core::{
    ExecutionContainer, PollError, PollOutcome, PollRunner, PollingJob, StateStore, UnitQueue,
};
use crate::infra::queue::DelayQueue;
use crate::runtime::local::LocalContainer;
use crate::util::clock::{Clock, SystemClock};
use crate::util::serde::PollingId;

/// Result of running one unit.
#[derive(Debug)]
pub struct DispatchResult {
    /// Logical poll the unit belonged to.
    pub polling_id: PollingId,
    /// Outcome of the execution, or the fault that aborted it.
    pub outcome: Result<PollOutcome, PollError>,
}

/// Runner wired to an in-process container and delayed queue.
pub type LocalRunner<S, J, K> = PollRunner<S, Arc<LocalContainer<K>>, Arc<DelayQueue<J>>>;

/// Acts as the execution container's scheduler: pops due units and runs them
/// one at a time, re-queueing any unit the runner released inline.
///
/// Sweeps must not overlap, because the container tracks a single
/// current unit.
pub struct Dispatcher<S, J, K = SystemClock> {
    runner: LocalRunner<S, J, K>,
}

impl<S, J, K> Dispatcher<S, J, K>
where
    S: StateStore,
    J: PollingJob<Unit = J>,
    K: Clock,
{
    /// Wrap an existing runner.
    pub const fn new(runner: LocalRunner<S, J, K>) -> Self {
        Self { runner }
    }

    /// Underlying runner.
    pub const fn runner(&self) -> &LocalRunner<S, J, K> {
        &self.runner
    }

    /// Enqueue a job to start after `delay`.
    pub fn submit(&self, job: J, delay: Duration) -> Result<(), PollError> {
        self.runner.queue().submit(job, delay)
    }

    /// Run every unit due now. Faulted units are logged and dropped.
    pub fn run_due(&self) -> Vec<DispatchResult> {
        let container = self.runner.container();
        let queue = self.runner.queue();
        let due = queue.drain_due(container.now_ms());
        if !due.is_empty() {
            debug!(count = due.len(), "dispatching due units");
        }

        let mut results = Vec::with_capacity(due.len());
        for mut job in due {
            let polling_id = job.polling_id();
            let _ = container.take_release();
            let mut outcome = self.runner.run(&mut job);

            if let Some(delay) = container.take_release() {
                if let Err(e) = queue.submit(job, delay) {
                    outcome = Err(e);
                }
            }
            if let Err(e) = &outcome {
                error!(%polling_id, "poll execution failed: {e}");
            }
            results.push(DispatchResult {
                polling_id,
                outcome,
            });
        }
        results
    }

    /// Sweep repeatedly, sleeping on the container clock until the next unit
    /// is due, until the queue is empty. Returns every result in order.
    pub fn run_until_idle(&self) -> Vec<DispatchResult> {
        let container = self.runner.container();
        let queue = self.runner.queue();
        let mut results = Vec::new();
        while let Some(next_due) = queue.next_due_ms() {
            let now = container.now_ms();
            if next_due > now {
                let wait = u64::try_from(next_due - now).unwrap_or(u64::MAX);
                container.clock().sleep(Duration::from_millis(wait));
            }
            results.extend(self.run_due());
        }
        results
    }
}
