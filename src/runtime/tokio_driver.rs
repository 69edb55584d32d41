//! Tokio driver for a [`Dispatcher`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::{PollingJob, StateStore};
use crate::runtime::Dispatcher;
use crate::util::clock::Clock;

/// Handle to a running dispatch loop.
pub struct DispatchLoop {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl DispatchLoop {
    /// Ask the loop to stop after the current sweep and wait for it.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!("dispatch loop terminated abnormally: {e}");
        }
    }
}

/// Spawn a loop sweeping `dispatcher` every `tick` on the current runtime.
///
/// Executions sleep synchronously between attempts, so each sweep runs on the
/// blocking pool. Sweeps never overlap.
pub fn spawn_dispatch_loop<S, J, K>(dispatcher: Arc<Dispatcher<S, J, K>>, tick: Duration) -> DispatchLoop
where
    S: StateStore + Send + Sync + 'static,
    J: PollingJob<Unit = J> + Send + 'static,
    K: Clock + 'static,
{
    let (shutdown, mut rx) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                changed = rx.changed() => {
                    if changed.is_err() || *rx.borrow() {
                        tracing::info!("dispatch loop shutting down");
                        break;
                    }
                    continue;
                }
            }

            let sweep = Arc::clone(&dispatcher);
            match tokio::task::spawn_blocking(move || sweep.run_due()).await {
                Ok(results) if !results.is_empty() => {
                    tracing::debug!(count = results.len(), "dispatch sweep finished");
                }
                Ok(_) => {}
                Err(e) => tracing::error!("dispatch sweep panicked: {e}"),
            }
        }
    });
    DispatchLoop { handle, shutdown }
}
