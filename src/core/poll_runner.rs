//! The polling control loop.
//!
//! Each invocation of [`PollRunner::run`] is one execution of a logical poll.
//! On every pass it decides between three paths:
//!
//! | condition (checked in order)                 | path              |
//! |----------------------------------------------|-------------------|
//! | attempts ≥ `max_attempts`                    | terminate (exhausted) |
//! | age ≥ `lifetime_secs`                        | terminate (expired)   |
//! | `has_poll_resolved()`                        | terminate (resolved)  |
//! | time or memory guard tripped                 | reschedule        |
//! | otherwise                                    | attempt inline    |
//!
//! An inline attempt that does not resolve bumps the attempt counter, sleeps
//! for the interval while holding the slot, and loops back to the decision,
//! so the guards are re-checked before every attempt.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::core::audit::{build_audit_event_at, AuditAction, AuditSink};
use crate::core::{
    ExecutionContainer, PollError, PollState, PollingJob, ResourceGuard, Rescheduler, StateStore,
    UnitQueue,
};
use crate::util::serde::{PollingId, ReleaseMode};

/// How one execution of a poll ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    /// The external condition resolved.
    Resolved,
    /// The attempt budget ran out without resolution.
    Exhausted,
    /// The poll outlived its lifetime without resolution.
    Expired,
    /// A guard tripped and exactly one resumption was scheduled.
    Rescheduled(ReleaseMode),
}

impl PollOutcome {
    /// True for outcomes that end the logical poll.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Rescheduled(_))
    }

    /// True when the poll gave up without resolving.
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Exhausted | Self::Expired)
    }
}

/// Per-invocation state. Lives for one call to [`PollRunner::run`].
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    execution_start_ms: u128,
    expired: bool,
}

impl ExecutionContext {
    /// Start a context at `execution_start_ms`.
    pub const fn new(execution_start_ms: u128) -> Self {
        Self {
            execution_start_ms,
            expired: false,
        }
    }

    /// When this execution started.
    pub const fn execution_start_ms(&self) -> u128 {
        self.execution_start_ms
    }

    /// Expiry check. Sticky: once true it stays true for this execution.
    pub fn check_expired(&mut self, started_at_ms: u128, now_ms: u128, lifetime: Duration) -> bool {
        if !self.expired {
            let age_ms = now_ms.saturating_sub(started_at_ms);
            self.expired = age_ms >= lifetime.as_millis();
        }
        self.expired
    }
}

enum Decision {
    Continue,
    Reschedule,
    Terminate(PollOutcome),
}

/// Drives a [`PollingJob`] through one execution.
pub struct PollRunner<S, C, Q> {
    store: S,
    container: C,
    queue: Q,
    config: PollConfig,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S, C, Q> PollRunner<S, C, Q>
where
    S: StateStore,
    C: ExecutionContainer,
{
    /// Create a runner from its collaborators.
    pub fn new(store: S, container: C, queue: Q, config: PollConfig) -> Self {
        Self {
            store,
            container,
            queue,
            config,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    pub(crate) fn with_shared_audit(mut self, audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>) -> Self {
        self.audit = audit;
        self
    }

    /// Poll configuration in effect.
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Durable store holding poll counters.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Execution container this runner reports to.
    pub const fn container(&self) -> &C {
        &self.container
    }

    /// Enqueue mechanism used for resubmission.
    pub const fn queue(&self) -> &Q {
        &self.queue
    }

    /// Run one execution of `job` until it terminates or reschedules.
    ///
    /// Domain faults and infrastructure failures propagate unchanged; the
    /// attempt counter is only bumped after an attempt returns unresolved.
    pub fn run<J>(&self, job: &mut J) -> Result<PollOutcome, PollError>
    where
        J: PollingJob,
        Q: UnitQueue<J::Unit>,
    {
        let mut ctx = ExecutionContext::new(self.container.now_ms());
        let polling_id = job.polling_id();
        let poll_type = job.poll_type();
        let state = PollState::new(&self.store, &poll_type, &polling_id);
        let started_at = state.get_started_at(ctx.execution_start_ms())?;
        debug!(%polling_id, %poll_type, %started_at, "poll execution started");

        loop {
            let attempts = state.get_attempts()?;
            match self.decide(job, &mut ctx, attempts, started_at)? {
                Decision::Terminate(outcome) => {
                    self.log_terminal(&polling_id, outcome, attempts);
                    self.record(&polling_id, &poll_type, outcome_action(outcome), attempts, None);
                    return Ok(outcome);
                }
                Decision::Reschedule => {
                    let rescheduler = Rescheduler::new(
                        &self.container,
                        &self.queue,
                        self.config.supports_inline_release,
                    );
                    let mode = rescheduler.reschedule(job, self.config.interval())?;
                    self.record(
                        &polling_id,
                        &poll_type,
                        AuditAction::Reschedule,
                        attempts,
                        Some(mode.to_string()),
                    );
                    return Ok(PollOutcome::Rescheduled(mode));
                }
                Decision::Continue => {}
            }

            if job.resolve_poll().map_err(PollError::Attempt)? {
                self.log_terminal(&polling_id, PollOutcome::Resolved, attempts);
                self.record(&polling_id, &poll_type, AuditAction::Resolved, attempts, None);
                return Ok(PollOutcome::Resolved);
            }

            let attempts = state.increment_attempts()?;
            debug!(%polling_id, attempts, "attempt did not resolve");
            self.record(&polling_id, &poll_type, AuditAction::Attempt, attempts, None);
            self.container.sleep(self.config.interval());
        }
    }

    fn decide<J: PollingJob>(
        &self,
        job: &J,
        ctx: &mut ExecutionContext,
        attempts: u32,
        started_at: u128,
    ) -> Result<Decision, PollError> {
        let now = self.container.now_ms();

        if attempts >= self.config.max_attempts {
            return Ok(Decision::Terminate(PollOutcome::Exhausted));
        }
        if ctx.check_expired(started_at, now, self.config.lifetime()) {
            return Ok(Decision::Terminate(PollOutcome::Expired));
        }

        let limits = self.container.limits();
        let near_time = ResourceGuard::is_approaching_time_limit(
            ctx.execution_start_ms(),
            now,
            limits.max_execution_secs,
        );
        let near_memory = ResourceGuard::is_approaching_memory_limit(
            limits.memory_limit,
            self.container.memory_usage_bytes(),
        );

        // Resolution wins over a guard trip in the same pass.
        if job.has_poll_resolved().map_err(PollError::Attempt)? {
            return Ok(Decision::Terminate(PollOutcome::Resolved));
        }
        if near_time || near_memory {
            debug!(near_time, near_memory, "resource guard tripped");
            return Ok(Decision::Reschedule);
        }
        Ok(Decision::Continue)
    }

    fn log_terminal(&self, polling_id: &PollingId, outcome: PollOutcome, attempts: u32) {
        match outcome {
            PollOutcome::Exhausted => warn!(
                %polling_id,
                attempts,
                max_attempts = self.config.max_attempts,
                "poll exhausted its attempts"
            ),
            PollOutcome::Expired => warn!(
                %polling_id,
                attempts,
                lifetime_secs = self.config.lifetime_secs,
                "poll expired"
            ),
            PollOutcome::Resolved => info!(%polling_id, attempts, "poll resolved"),
            PollOutcome::Rescheduled(_) => {}
        }
    }

    fn record(
        &self,
        polling_id: &PollingId,
        poll_type: &str,
        action: AuditAction,
        attempts: u32,
        detail: Option<String>,
    ) {
        if let Some(sink) = &self.audit {
            let event = build_audit_event_at(
                polling_id.clone(),
                poll_type,
                action,
                attempts,
                detail,
                self.container.now_ms(),
            );
            sink.lock().record(event);
        }
    }
}

const fn outcome_action(outcome: PollOutcome) -> AuditAction {
    match outcome {
        PollOutcome::Resolved => AuditAction::Resolved,
        PollOutcome::Exhausted => AuditAction::Exhausted,
        PollOutcome::Expired => AuditAction::Expired,
        PollOutcome::Rescheduled(_) => AuditAction::Reschedule,
    }
}
