//! Shared utilities.

pub mod clock;
pub mod serde;
pub mod telemetry;

pub use self::clock::{now_ms, Clock, ManualClock, SystemClock};
pub use self::serde::{PollingId, ReleaseMode};
pub use self::telemetry::{init_tracing, init_tracing_with_default};
