//! Tests for builder modules

use std::collections::HashMap;

use prometheus_poller::builders::PollRunnerBuilder;
use prometheus_poller::config::{ExecutionLimits, PollConfig, PollerConfig};
use prometheus_poller::infra::{DelayQueue, InMemoryStore};
use prometheus_poller::runtime::LocalContainer;

type Builder = PollRunnerBuilder<InMemoryStore, LocalContainer, DelayQueue<String>>;

#[test]
fn test_builder_defaults() {
    let runner = Builder::new()
        .store(InMemoryStore::new())
        .container(LocalContainer::new(ExecutionLimits::unlimited()))
        .queue(DelayQueue::new(8))
        .build()
        .unwrap();
    assert_eq!(runner.config(), &PollConfig::default());
    assert_eq!(runner.queue().max_depth(), 8);
}

#[test]
fn test_builder_for_poll_type() {
    let mut polls = HashMap::new();
    polls.insert("export".to_string(), PollConfig::new().with_max_attempts(4));
    let cfg = PollerConfig { polls };

    let builder = Builder::for_poll_type(&cfg, "export");
    assert_eq!(builder.current_config().max_attempts, 4);
}

#[test]
fn test_builder_requires_components() {
    let err = Builder::new().store(InMemoryStore::new()).build().err().unwrap();
    assert!(err.to_string().contains("container not set"));
}

#[test]
fn test_builder_validates_config() {
    let result = Builder::new()
        .store(InMemoryStore::new())
        .container(LocalContainer::new(ExecutionLimits::unlimited()))
        .queue(DelayQueue::new(8))
        .config(PollConfig::new().with_max_attempts(0))
        .build();
    assert!(result.is_err());
}
