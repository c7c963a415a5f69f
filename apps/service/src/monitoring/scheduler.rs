use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use super::executor::MonitoringExecutor;
use super::recorder::{HistoryRecorder, WritePolicy};
use super::types::{CheckOutcome, RecordAction};
use crate::error::StoreError;
use crate::models::{Monitor, MonitorStatus};
use crate::registry::MonitorRegistry;

/// A monitor is due when it is `PENDING`, has never been checked, or its
/// interval has elapsed since the last check attempt.
pub fn is_due(monitor: &Monitor, now: i64) -> bool {
    match monitor.last_checked {
        _ if monitor.status == MonitorStatus::Pending => true,
        None => true,
        Some(last_checked) => now - last_checked >= monitor.interval_ms(),
    }
}

/// Monitoring scheduler - decides which monitors to check and records results
pub struct MonitoringScheduler {
    registry: Arc<MonitorRegistry>,
    executor: Arc<MonitoringExecutor>,
    recorder: HistoryRecorder,
    max_concurrent_checks: usize,
}

impl MonitoringScheduler {
    pub fn new(
        registry: Arc<MonitorRegistry>,
        executor: Arc<MonitoringExecutor>,
        recorder: HistoryRecorder,
        max_concurrent_checks: usize,
    ) -> Self {
        Self {
            registry,
            executor,
            recorder,
            max_concurrent_checks: max_concurrent_checks.max(1),
        }
    }

    /// Check every due monitor once. One monitor failing never stops the
    /// others; outcomes come back in listing order.
    pub async fn sweep(&self) -> Result<Vec<CheckOutcome>, StoreError> {
        let monitors = self.registry.list().await?;
        let now = self.executor.clock().now_ms();

        let outcomes: Vec<CheckOutcome> = stream::iter(monitors)
            .map(|monitor| self.sweep_one(monitor, now))
            .buffered(self.max_concurrent_checks)
            .collect()
            .await;

        let checked = outcomes.iter().filter(|o| o.checked).count();
        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
        info!(
            total = outcomes.len(),
            checked,
            failed,
            "Sweep completed"
        );

        Ok(outcomes)
    }

    async fn sweep_one(&self, monitor: Monitor, now: i64) -> CheckOutcome {
        let Monitor { id, name, .. } = &monitor;
        if !is_due(&monitor, now) {
            return CheckOutcome::skipped(id.clone(), name.clone());
        }

        let entry = self.executor.execute_check(&monitor, false).await;
        let summary = CheckOutcome::checked(id.clone(), name.clone(), &entry);

        let recorder = self.recorder;
        let policy = WritePolicy::Suppressible { now };
        match self.registry.mutate(id, move |current| recorder.record(current, entry, policy)).await {
            Ok((_, RecordAction::Persisted)) => {
                debug!(monitor_id = %id, status = ?summary.status, "History entry persisted");
                summary
            }
            Ok((_, RecordAction::Refreshed)) => summary,
            Err(e) => {
                warn!(monitor_id = %id, "Failed to record check result: {}", e);
                CheckOutcome::failed(id.clone(), name.clone(), e.to_string())
            }
        }
    }

    /// Check one monitor right now, ignoring the interval and always
    /// writing a history entry.
    pub async fn check_now(&self, id: &str, simulate_failure: bool) -> Result<Monitor, StoreError> {
        let monitor = self
            .registry
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let entry = self.executor.execute_check(&monitor, simulate_failure).await;
        info!(
            monitor_id = id,
            status = %entry.status,
            simulated = simulate_failure,
            "Manual check completed"
        );

        let recorder = self.recorder;
        let (updated, _) = self
            .registry
            .mutate(id, move |current| recorder.record(current, entry, WritePolicy::Always))
            .await?;
        Ok(updated)
    }

    /// Run [`Self::sweep`] on a fixed period until the task is aborted
    pub fn start(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Sweep scheduler started (every {}s)", period.as_secs());

            loop {
                timer.tick().await;

                if let Err(e) = self.sweep().await {
                    error!("Sweep failed: {}", e);
                }
            }
        })
    }
}
