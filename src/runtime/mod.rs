//! Runtime adapters: an in-process container, a dispatcher, and a tokio driver.

pub mod dispatcher;
pub mod local;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_driver;

pub use dispatcher::{DispatchResult, Dispatcher, LocalRunner};
pub use local::{process_memory_bytes, LocalContainer};
#[cfg(feature = "tokio-runtime")]
pub use tokio_driver::{spawn_dispatch_loop, DispatchLoop};
