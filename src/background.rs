//! # Owned Background Loops
//!
//! Periodic work (rate limit sweeps, scheduled health refreshes) runs in a
//! `PeriodicTask` that the owning component starts explicitly and stops
//! explicitly. Dropping the task aborts the loop, so nothing outlives its
//! owner across test runs or restarts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Handle to a spawned interval loop
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Spawn `tick` every `interval`; the first run happens one interval after start
    pub fn spawn<F, Fut>(name: &'static str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let shutdown = Arc::new(Notify::new());
        let shutdown_signal = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() completes its first tick immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!(task = name, "Periodic task tick");
                        tick().await;
                    }
                    _ = shutdown_signal.notified() => {
                        info!(task = name, "Periodic task shutting down");
                        break;
                    }
                }
            }
        });

        info!(
            task = name,
            interval_ms = interval.as_millis() as u64,
            "🔄 Periodic task started"
        );

        Self {
            name,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop to stop and wait for it to exit
    pub async fn shutdown(mut self) {
        // notify_one stores a permit if the loop is mid-tick
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(task = self.name, error = %e, "Periodic task ended abnormally");
                }
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
