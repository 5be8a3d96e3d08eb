//! Recurring scheduler tick for time-driven window transitions.
//!
//! A single background task wakes on a fixed interval and asks the service
//! layer to promote due windows and complete expired ones. There is no
//! in-memory scheduler state: every tick re-reads the store, because the
//! command API mutates the same records between ticks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::services::MaintenanceService;

pub struct MaintenanceScheduler {
    service: Arc<MaintenanceService>,
    tick_interval: Duration,
}

impl MaintenanceScheduler {
    pub fn new(service: Arc<MaintenanceService>, tick_interval_seconds: u64) -> Self {
        Self {
            service,
            tick_interval: Duration::from_secs(tick_interval_seconds.max(1)),
        }
    }

    /// Spawns the tick loop. Ticks are strictly serialized: the loop awaits
    /// each pass before sleeping again, so two ticks can never race on the
    /// active-window handoff. The first tick fires immediately, which also
    /// catches up on transitions missed while the process was down.
    pub fn start(&self) -> JoinHandle<()> {
        let service = self.service.clone();
        let period = self.tick_interval;
        info!(
            "Starting maintenance scheduler with {}s tick interval",
            period.as_secs()
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match service.run_tick(Utc::now()).await {
                    Ok(summary) if summary.promoted > 0 || summary.completed > 0 => {
                        info!(
                            "Scheduler tick: {} window(s) started, {} completed",
                            summary.promoted, summary.completed
                        );
                    }
                    Ok(_) => debug!("Scheduler tick: nothing due"),
                    // The next tick retries; affected rows keep their
                    // pre-transition state.
                    Err(e) => error!("Scheduler tick failed: {}", e),
                }
            }
        })
    }
}
