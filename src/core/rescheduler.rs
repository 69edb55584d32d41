//! Hands a poll back to the work queue for later resumption.

use std::time::Duration;

use tracing::{debug, info};

use crate::core::{ExecutionContainer, PollError, PollingJob, UnitQueue};
use crate::util::serde::ReleaseMode;

/// Arranges exactly one resumption of a poll per call.
///
/// With inline release the container puts the current unit back on its queue
/// with a visibility delay. Otherwise the job builds an equivalent successor
/// that is submitted to the enqueue mechanism.
pub struct Rescheduler<'a, C, Q> {
    container: &'a C,
    queue: &'a Q,
    supports_inline_release: bool,
}

impl<'a, C, Q> Rescheduler<'a, C, Q>
where
    C: ExecutionContainer,
{
    /// Create a rescheduler over the current container and enqueue mechanism.
    pub const fn new(container: &'a C, queue: &'a Q, supports_inline_release: bool) -> Self {
        Self {
            container,
            queue,
            supports_inline_release,
        }
    }

    /// Schedule `job` to resume after `interval`. No deduplication: callers
    /// invoke this at most once per terminating decision.
    pub fn reschedule<J>(&self, job: &J, interval: Duration) -> Result<ReleaseMode, PollError>
    where
        J: PollingJob,
        Q: UnitQueue<J::Unit>,
    {
        if self.supports_inline_release {
            self.container.release(interval)?;
            info!(
                polling_id = %job.polling_id(),
                delay_secs = interval.as_secs(),
                "released poll for deferred resumption"
            );
            return Ok(ReleaseMode::Inline);
        }

        let unit = job.resolve_polling_job().map_err(PollError::Attempt)?;
        debug!(polling_id = %job.polling_id(), "built successor unit");
        self.queue.submit(unit, interval)?;
        info!(
            polling_id = %job.polling_id(),
            delay_secs = interval.as_secs(),
            "resubmitted poll as a new unit"
        );
        Ok(ReleaseMode::Resubmit)
    }
}
