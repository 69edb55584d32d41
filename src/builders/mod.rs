//! Builders to assemble poll runners from configuration.

pub mod runner_builder;

pub use runner_builder::PollRunnerBuilder;
