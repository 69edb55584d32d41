//! # Prometheus Poller
//!
//! Resumable, resource-aware polling for background work units.
//!
//! Some background jobs have to wait for an external operation to finish: a
//! model download, a remote export, a payment settling. Polling inline
//! forever would monopolize a worker slot, and a worker that runs out of time
//! or memory is killed mid-update. This crate implements the control loop
//! that, on every iteration, chooses to keep polling inline, hand the poll
//! back to the queue for a later resumption, or stop.
//!
//! ## Components
//!
//! - **`PollState`**: attempt counter and start time of a logical poll, kept
//!   in a durable [`core::StateStore`] so they survive across executions.
//! - **`ResourceGuard`**: trips when the current execution nears its time
//!   or memory budget.
//! - **`Rescheduler`**: releases the current unit with a delay, or builds and
//!   enqueues an equivalent successor.
//! - **`PollRunner`**: the decision loop tying them together.
//!
//! ## Example
//!
//! ```rust,ignore
//! use prometheus_poller::config::{ExecutionLimits, PollConfig};
//! use prometheus_poller::core::{AppResult, PollRunner, PollingJob};
//! use prometheus_poller::infra::{DelayQueue, InMemoryStore};
//! use prometheus_poller::runtime::LocalContainer;
//! use prometheus_poller::util::PollingId;
//!
//! struct AwaitExport { export_id: String }
//!
//! impl PollingJob for AwaitExport {
//!     type Unit = Self;
//!     fn polling_id(&self) -> PollingId { self.export_id.as_str().into() }
//!     fn has_poll_resolved(&self) -> AppResult<bool> { Ok(false) }
//!     fn resolve_poll(&mut self) -> AppResult<bool> { check_export(&self.export_id) }
//!     fn resolve_polling_job(&self) -> AppResult<Self> {
//!         Ok(Self { export_id: self.export_id.clone() })
//!     }
//! }
//!
//! let runner = PollRunner::new(
//!     InMemoryStore::new(),
//!     LocalContainer::new(ExecutionLimits::unlimited()),
//!     DelayQueue::new(1024),
//!     PollConfig::new().with_interval_secs(5),
//! );
//! let outcome = runner.run(&mut AwaitExport { export_id: "exp-1".into() })?;
//! ```
//!
//! For complete scenarios, see `tests/poll_runner_test.rs`.

/// Core polling abstractions and the control loop.
pub mod core;
/// Configuration models for poll types and execution limits.
pub mod config;
/// Builders to assemble runners from configuration.
pub mod builders;
/// Infrastructure adapters for state stores and delayed queues.
pub mod infra;
/// Runtime adapters: local container, dispatcher, tokio driver.
pub mod runtime;
/// Shared utilities.
pub mod util;
