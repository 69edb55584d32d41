//! Tests for resource guards

use prometheus_poller::config::MemoryLimit;
use prometheus_poller::core::ResourceGuard;

const MB: u64 = 1024 * 1024;

#[test]
fn test_time_guard_with_bounded_budget() {
    let start = 1_000_000;
    // 60s budget, 49s elapsed: 11s remain
    assert!(!ResourceGuard::is_approaching_time_limit(start, start + 49_000, 60));
    // 51s elapsed: 9s remain
    assert!(ResourceGuard::is_approaching_time_limit(start, start + 51_000, 60));
}

#[test]
fn test_time_guard_with_unbounded_budget() {
    assert!(!ResourceGuard::is_approaching_time_limit(0, 10_000_000, 0));
}

#[test]
fn test_memory_guard_against_parsed_limit() {
    let limit = MemoryLimit::parse("128M").unwrap();
    assert!(!ResourceGuard::is_approaching_memory_limit(limit, 64 * MB));
    assert!(ResourceGuard::is_approaching_memory_limit(limit, 100 * MB));
}

#[test]
fn test_memory_guard_unlimited() {
    let limit = MemoryLimit::parse("-1").unwrap();
    assert!(!ResourceGuard::is_approaching_memory_limit(limit, u64::MAX));
}
