//! Tests for runtime adapters

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use prometheus_poller::config::{ExecutionLimits, PollConfig};
use prometheus_poller::core::{AppResult, PollOutcome, PollRunner, PollingJob};
use prometheus_poller::infra::{DelayQueue, InMemoryStore};
use prometheus_poller::runtime::{spawn_dispatch_loop, Dispatcher, LocalContainer};
use prometheus_poller::util::PollingId;

#[derive(Clone)]
struct CountingJob {
    calls: Arc<AtomicU32>,
}

impl PollingJob for CountingJob {
    type Unit = Self;

    fn polling_id(&self) -> PollingId {
        "counting".into()
    }

    fn has_poll_resolved(&self) -> AppResult<bool> {
        Ok(false)
    }

    fn resolve_poll(&mut self) -> AppResult<bool> {
        Ok(self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= 2)
    }

    fn resolve_polling_job(&self) -> AppResult<Self> {
        Ok(self.clone())
    }
}

fn dispatcher() -> Dispatcher<InMemoryStore, CountingJob> {
    let runner = PollRunner::new(
        InMemoryStore::new(),
        Arc::new(LocalContainer::new(ExecutionLimits::unlimited())),
        Arc::new(DelayQueue::new(8)),
        PollConfig::new().with_interval_secs(0),
    );
    Dispatcher::new(runner)
}

#[test]
fn test_dispatcher_skips_units_not_yet_due() {
    let dispatcher = dispatcher();
    let calls = Arc::new(AtomicU32::new(0));
    dispatcher
        .submit(CountingJob { calls: Arc::clone(&calls) }, Duration::from_secs(3600))
        .unwrap();

    assert!(dispatcher.run_due().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.runner().queue().len(), 1);
}

#[test]
fn test_dispatcher_runs_due_units() {
    let dispatcher = dispatcher();
    let calls = Arc::new(AtomicU32::new(0));
    dispatcher
        .submit(CountingJob { calls: Arc::clone(&calls) }, Duration::ZERO)
        .unwrap();

    let results = dispatcher.run_due();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].polling_id, "counting");
    assert_eq!(results[0].outcome.as_ref().unwrap(), &PollOutcome::Resolved);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dispatch_loop_drains_queue_and_shuts_down() {
    let dispatcher = Arc::new(dispatcher());
    let calls = Arc::new(AtomicU32::new(0));
    dispatcher
        .submit(CountingJob { calls: Arc::clone(&calls) }, Duration::ZERO)
        .unwrap();

    let dispatch_loop = spawn_dispatch_loop(Arc::clone(&dispatcher), Duration::from_millis(10));
    for _ in 0..200 {
        if dispatcher.runner().queue().is_empty() && calls.load(Ordering::SeqCst) >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    dispatch_loop.shutdown().await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(dispatcher.runner().queue().is_empty());
}
