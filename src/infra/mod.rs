//! Infrastructure adapters for durable state and delayed queues.

pub mod queue;
pub mod store;

pub use queue::DelayQueue;
pub use store::{FileStore, InMemoryStore};
