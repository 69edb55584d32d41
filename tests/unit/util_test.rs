//! Tests for utility functions

use std::time::Duration;

use prometheus_poller::util::{now_ms, Clock, ManualClock, PollingId, ReleaseMode};

#[test]
fn test_polling_id_is_transparent() {
    let id = PollingId::from("export-42");
    assert_eq!(id.as_str(), "export-42");
    assert_eq!(id.to_string(), "export-42");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"export-42\"");
    assert_eq!(id, "export-42");
    assert_eq!(PollingId::from(&id), id);
}

#[test]
fn test_release_mode_names() {
    assert_eq!(ReleaseMode::Inline.to_string(), "inline");
    assert_eq!(serde_json::to_string(&ReleaseMode::Resubmit).unwrap(), "\"resubmit\"");
}

#[test]
fn test_manual_clock() {
    let clock = ManualClock::new(0);
    clock.sleep(Duration::from_millis(250));
    clock.advance(Duration::from_secs(1));
    assert_eq!(clock.now_ms(), 1_250);
}

#[test]
fn test_now_ms() {
    assert!(now_ms() > 1_600_000_000_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    prometheus_poller::util::init_tracing_with_default("prometheus_poller=debug");
    prometheus_poller::util::init_tracing();
}
