//! Tests for the rescheduler

use std::cell::RefCell;
use std::time::Duration;

use prometheus_poller::config::ExecutionLimits;
use prometheus_poller::core::{
    AppResult, ExecutionContainer, PollError, PollingJob, Rescheduler, UnitQueue,
};
use prometheus_poller::util::{PollingId, ReleaseMode};

#[derive(Default)]
struct RecordingContainer {
    releases: RefCell<Vec<Duration>>,
}

impl ExecutionContainer for RecordingContainer {
    fn now_ms(&self) -> u128 {
        0
    }

    fn limits(&self) -> ExecutionLimits {
        ExecutionLimits::unlimited()
    }

    fn memory_usage_bytes(&self) -> u64 {
        0
    }

    fn release(&self, delay: Duration) -> Result<(), PollError> {
        self.releases.borrow_mut().push(delay);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingQueue {
    submitted: RefCell<Vec<(String, Duration)>>,
}

impl UnitQueue<String> for RecordingQueue {
    fn submit(&self, unit: String, delay: Duration) -> Result<(), PollError> {
        self.submitted.borrow_mut().push((unit, delay));
        Ok(())
    }
}

struct ReportJob {
    report_id: u32,
}

impl PollingJob for ReportJob {
    type Unit = String;

    fn polling_id(&self) -> PollingId {
        PollingId::new(format!("report-{}", self.report_id))
    }

    fn has_poll_resolved(&self) -> AppResult<bool> {
        Ok(false)
    }

    fn resolve_poll(&mut self) -> AppResult<bool> {
        Ok(false)
    }

    fn resolve_polling_job(&self) -> AppResult<String> {
        Ok(format!("successor-of-{}", self.report_id))
    }
}

#[test]
fn test_inline_release_uses_container() {
    let container = RecordingContainer::default();
    let queue = RecordingQueue::default();
    let rescheduler = Rescheduler::new(&container, &queue, true);

    let mode = rescheduler
        .reschedule(&ReportJob { report_id: 7 }, Duration::from_secs(3))
        .unwrap();

    assert_eq!(mode, ReleaseMode::Inline);
    assert_eq!(*container.releases.borrow(), vec![Duration::from_secs(3)]);
    assert!(queue.submitted.borrow().is_empty());
}

#[test]
fn test_resubmission_builds_successor() {
    let container = RecordingContainer::default();
    let queue = RecordingQueue::default();
    let rescheduler = Rescheduler::new(&container, &queue, false);

    let mode = rescheduler
        .reschedule(&ReportJob { report_id: 7 }, Duration::from_secs(5))
        .unwrap();

    assert_eq!(mode, ReleaseMode::Resubmit);
    assert!(container.releases.borrow().is_empty());
    assert_eq!(
        *queue.submitted.borrow(),
        vec![("successor-of-7".to_string(), Duration::from_secs(5))]
    );
}
