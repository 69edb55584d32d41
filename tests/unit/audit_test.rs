//! Tests for audit sinks

use prometheus_poller::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, TracingAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("poll-1", "export", AuditAction::Attempt, 1, Some("note".to_string()));

    sink.record(event);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].polling_id, "poll-1");
    assert_eq!(events[0].poll_type, "export");
    assert_eq!(events[0].action, AuditAction::Attempt);
    assert_eq!(events[0].detail, Some("note".to_string()));
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("p", "t", AuditAction::Attempt, 1, None));
    sink.record(build_audit_event("p", "t", AuditAction::Attempt, 2, None));
    sink.record(build_audit_event("p", "t", AuditAction::Exhausted, 2, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].attempts, 2); // First one popped
    assert_eq!(events[1].action, AuditAction::Exhausted);
}

#[test]
fn test_zero_capacity_sink_drops_everything() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event("p", "t", AuditAction::Resolved, 0, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event("p", "t", AuditAction::Reschedule, 3, Some("inline".into()));
    let b = build_audit_event("p", "t", AuditAction::Reschedule, 3, None);

    assert_ne!(a.event_id, b.event_id);
    assert!(a.created_at_ms > 0);
    assert_eq!(a.action.to_string(), "reschedule");
}

#[test]
fn test_tracing_sink_accepts_events() {
    let mut sink = TracingAuditSink;
    sink.record(build_audit_event("p", "t", AuditAction::Expired, 7, None));
}
