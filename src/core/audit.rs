//! Audit trail of poll decisions.
//!
//! The store only keeps counters, so a poll that stopped without resolving
//! looks the same as one that never ran. Attaching a sink to the runner
//! records every attempt and the terminal decision of each execution.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::PollingId;

/// Decision or step recorded by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// One domain attempt ran and did not resolve.
    Attempt,
    /// The poll was handed back to the queue.
    Reschedule,
    /// The poll resolved.
    Resolved,
    /// The poll ran out of attempts.
    Exhausted,
    /// The poll outlived its lifetime.
    Expired,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attempt => "attempt",
            Self::Reschedule => "reschedule",
            Self::Resolved => "resolved",
            Self::Exhausted => "exhausted",
            Self::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Logical poll identifier.
    pub polling_id: PollingId,
    /// Poll type namespace.
    pub poll_type: String,
    /// What happened.
    pub action: AuditAction,
    /// Attempt count at the time of the event.
    pub attempts: u32,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that emits each event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "prometheus_poller::audit",
            event_id = %event.event_id,
            polling_id = %event.polling_id,
            poll_type = %event.poll_type,
            action = %event.action,
            attempts = event.attempts,
            detail = event.detail.as_deref().unwrap_or(""),
            "poll audit"
        );
    }
}

/// Helper to build an audit event stamped with the current wall-clock time.
pub fn build_audit_event(
    polling_id: impl Into<PollingId>,
    poll_type: impl Into<String>,
    action: AuditAction,
    attempts: u32,
    detail: Option<String>,
) -> AuditEvent {
    build_audit_event_at(polling_id, poll_type, action, attempts, detail, now_ms())
}

/// Build an audit event stamped at `created_at_ms`.
pub fn build_audit_event_at(
    polling_id: impl Into<PollingId>,
    poll_type: impl Into<String>,
    action: AuditAction,
    attempts: u32,
    detail: Option<String>,
    created_at_ms: u128,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        polling_id: polling_id.into(),
        poll_type: poll_type.into(),
        action,
        attempts,
        created_at_ms,
        detail,
    }
}

impl<T: AuditSink> AuditSink for std::sync::Arc<parking_lot::Mutex<T>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}
