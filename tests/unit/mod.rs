//! Unit tests for individual components

mod audit_test;
mod builders_test;
mod config_test;
mod guard_test;
mod rescheduler_test;
mod runtime_test;
mod util_test;
