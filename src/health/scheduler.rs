//! Scheduled health refresh.

use super::cache::HealthCache;
use crate::background::PeriodicTask;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Refreshes a fixed set of forums on an interval
///
/// Each tick waits for its batch, so scheduled batches never overlap each
/// other. Manual refreshes may still run alongside.
#[derive(Debug)]
pub struct HealthRefreshScheduler {
    task: PeriodicTask,
}

impl HealthRefreshScheduler {
    pub fn start(cache: HealthCache, forum_ids: Vec<String>, interval: Duration) -> Self {
        let forum_ids: Arc<[String]> = forum_ids.into();
        let task = PeriodicTask::spawn("health_refresh_scheduler", interval, move || {
            let cache = cache.clone();
            let forum_ids = forum_ids.clone();
            async move {
                let handle = cache.refresh(forum_ids.iter().cloned());
                if let Some(summary) = handle.wait().await {
                    debug!(
                        batch_id = %summary.batch_id,
                        failed = summary.failed,
                        "Scheduled health refresh finished"
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
