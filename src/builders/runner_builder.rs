//! Fluent construction of a [`PollRunner`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{PollConfig, PollerConfig};
use crate::core::{AuditSink, ExecutionContainer, PollError, PollRunner, StateStore};

/// Collects a runner's collaborators and validates configuration on build.
pub struct PollRunnerBuilder<S, C, Q> {
    store: Option<S>,
    container: Option<C>,
    queue: Option<Q>,
    config: PollConfig,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S, C, Q> Default for PollRunnerBuilder<S, C, Q> {
    fn default() -> Self {
        Self {
            store: None,
            container: None,
            queue: None,
            config: PollConfig::default(),
            audit: None,
        }
    }
}

impl<S, C, Q> PollRunnerBuilder<S, C, Q>
where
    S: StateStore,
    C: ExecutionContainer,
{
    /// Start from default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the settings of `poll_type` in a root configuration.
    pub fn for_poll_type(cfg: &PollerConfig, poll_type: &str) -> Self {
        Self::new().config(cfg.for_poll_type(poll_type))
    }

    /// Durable store for counters.
    #[must_use]
    pub fn store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    /// Execution container.
    #[must_use]
    pub fn container(mut self, container: C) -> Self {
        self.container = Some(container);
        self
    }

    /// Enqueue mechanism for resubmission.
    #[must_use]
    pub fn queue(mut self, queue: Q) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Poll configuration.
    #[must_use]
    pub fn config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Audit sink receiving poll decisions.
    #[must_use]
    pub fn audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Configuration collected so far.
    pub const fn current_config(&self) -> &PollConfig {
        &self.config
    }

    /// Validate and assemble the runner.
    pub fn build(self) -> Result<PollRunner<S, C, Q>, PollError> {
        self.config.validate()?;
        let store = self
            .store
            .ok_or_else(|| PollError::InvalidConfig("store not set".into()))?;
        let container = self
            .container
            .ok_or_else(|| PollError::InvalidConfig("container not set".into()))?;
        let queue = self
            .queue
            .ok_or_else(|| PollError::InvalidConfig("queue not set".into()))?;
        Ok(PollRunner::new(store, container, queue, self.config).with_shared_audit(self.audit))
    }
}
