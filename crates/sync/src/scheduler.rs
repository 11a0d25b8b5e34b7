//! Fixed-interval sync scheduler
//!
//! Triggers a full sync pass every `interval_secs`. An `AtomicBool`
//! guards against overlap: if a pass is still running when the next
//! tick fires, the tick is skipped rather than queued. There is no
//! cancellation and no per-platform timeout; a stuck pass simply holds
//! the guard until it returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::orchestrator::{PlatformSelection, SyncOrchestrator};

/// Fixed-interval scheduler around the orchestrator
pub struct SyncScheduler {
    orchestrator: Arc<SyncOrchestrator>,
    workspace_id: u32,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl SyncScheduler {
    /// Create a scheduler for one workspace
    pub fn new(orchestrator: Arc<SyncOrchestrator>, workspace_id: u32, interval_secs: u64) -> Self {
        Self {
            orchestrator,
            workspace_id,
            interval: Duration::from_secs(interval_secs),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a sync pass is currently in flight
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run the schedule loop until the task is dropped
    ///
    /// The first pass fires immediately, then every interval. Takes
    /// `&self` so a caller holding the scheduler can poll
    /// [`is_running`](Self::is_running) while the loop is spawned.
    pub async fn run(&self) {
        info!(
            workspace_id = self.workspace_id,
            interval_secs = self.interval.as_secs(),
            "sync scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if self.running.swap(true, Ordering::AcqRel) {
                warn!(
                    workspace_id = self.workspace_id,
                    "previous sync pass still running, skipping tick"
                );
                continue;
            }

            let orchestrator = Arc::clone(&self.orchestrator);
            let running = Arc::clone(&self.running);
            let workspace_id = self.workspace_id;

            tokio::spawn(async move {
                match orchestrator
                    .sync(workspace_id, PlatformSelection::All, false)
                    .await
                {
                    Ok(summary) => {
                        info!(
                            workspace_id,
                            records = summary.records_written(),
                            errors = summary.error_count,
                            "scheduled sync pass finished"
                        );
                    }
                    Err(e) => {
                        error!(workspace_id, error = %e, "scheduled sync pass aborted");
                    }
                }
                running.store(false, Ordering::Release);
            });
        }
    }
}
