//! History retention.
//!
//! A check result either becomes a persisted history entry or only moves
//! `lastChecked`. Manual checks always persist. Sweeps persist when the
//! status changes, when the monitor is still `PENDING`, or when the
//! heartbeat window has passed since the last check attempt.

use tracing::debug;

use super::types::RecordAction;
use crate::models::{HISTORY_CAPACITY, Monitor, MonitorHistory, MonitorStatus};

/// Default heartbeat window in milliseconds
pub const DEFAULT_HEARTBEAT_MS: i64 = 300_000;

/// How a result may be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Manual checks
    Always,
    /// Sweeps; `now` is the sweep's reference time
    Suppressible { now: i64 },
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryRecorder {
    capacity: usize,
    heartbeat_ms: i64,
}

impl Default for HistoryRecorder {
    fn default() -> Self {
        Self { capacity: HISTORY_CAPACITY, heartbeat_ms: DEFAULT_HEARTBEAT_MS }
    }
}

impl HistoryRecorder {
    pub fn new(capacity: usize, heartbeat_ms: i64) -> Self {
        Self { capacity: capacity.max(1), heartbeat_ms }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `entry` must be written as a full history record
    pub fn should_persist(&self, monitor: &Monitor, entry: &MonitorHistory, policy: WritePolicy) -> bool {
        match policy {
            WritePolicy::Always => true,
            WritePolicy::Suppressible { now } => {
                let status_changed = monitor.status != entry.status;
                let pending = monitor.status == MonitorStatus::Pending;
                let since_last_check = now - monitor.last_checked.unwrap_or(0);
                status_changed || pending || since_last_check >= self.heartbeat_ms
            }
        }
    }

    /// Apply `entry` to `monitor` according to `policy`
    pub fn record(
        &self,
        mut monitor: Monitor,
        entry: MonitorHistory,
        policy: WritePolicy,
    ) -> (Monitor, RecordAction) {
        if !self.should_persist(&monitor, &entry, policy) {
            let now = match policy {
                WritePolicy::Suppressible { now } => now,
                WritePolicy::Always => entry.timestamp,
            };
            monitor.last_checked = Some(monitor.last_checked.map_or(now, |last| last.max(now)));
            debug!(monitor_id = %monitor.id, status = %entry.status, "History write suppressed");
            return (monitor, RecordAction::Refreshed);
        }

        self.append(&mut monitor, entry);
        (monitor, RecordAction::Persisted)
    }

    /// Insert newest-first, truncate to capacity, mirror the head's status
    fn append(&self, monitor: &mut Monitor, entry: MonitorHistory) {
        let timestamp = entry.timestamp;

        // Normally the head; a write that lost a race lands behind newer entries.
        let position = monitor.history.partition_point(|existing| existing.timestamp > timestamp);
        monitor.history.insert(position, entry);
        monitor.history.truncate(self.capacity);

        if let Some(head) = monitor.history.first() {
            monitor.status = head.status.into();
        }
        monitor.last_checked = Some(monitor.last_checked.map_or(timestamp, |last| last.max(timestamp)));
    }
}
