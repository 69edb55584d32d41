//! Core polling abstractions and the control loop.

pub mod audit;
pub mod container;
pub mod error;
pub mod poll_runner;
pub mod poll_state;
pub mod rescheduler;
pub mod resource_guard;

pub use audit::{
    build_audit_event, build_audit_event_at, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use container::{ExecutionContainer, PollingJob, UnitQueue};
pub use error::{AppResult, PollError};
pub use poll_runner::{ExecutionContext, PollOutcome, PollRunner};
pub use poll_state::{PollState, StateStore};
pub use rescheduler::Rescheduler;
pub use resource_guard::{ResourceGuard, MEMORY_THRESHOLD_PERCENT, TIME_THRESHOLD};
