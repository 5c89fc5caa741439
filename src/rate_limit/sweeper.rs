//! Periodic pruning of expired rate limit entries.

use super::store::RateLimitStore;
use crate::background::PeriodicTask;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Owned sweep loop; stop it with `shutdown` or by dropping it
#[derive(Debug)]
pub struct RateLimitSweeper {
    task: PeriodicTask,
}

impl RateLimitSweeper {
    pub fn start(store: Arc<dyn RateLimitStore>, interval: Duration) -> Self {
        let task = PeriodicTask::spawn("rate_limit_sweeper", interval, move || {
            let store = store.clone();
            async move {
                let removed = store.remove_expired(Utc::now());
                if removed > 0 {
                    debug!(
                        removed = removed,
                        remaining = store.len(),
                        backend = store.backend_name(),
                        "🧹 Swept expired rate limit entries"
                    );
                }
            }
        });
        Self { task }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    pub async fn shutdown(self) {
        self.task.shutdown().await;
    }
}
