use serde::Serialize;

use crate::models::{CheckStatus, Monitor, MonitorStatus};

/// Latest latency of one monitor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencySample {
    pub monitor_id: String,
    pub name: String,
    pub status: MonitorStatus,
    pub latency: u64,
}

/// Fleet-wide summary built from current monitor state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    pub total_monitors: usize,
    pub up_count: usize,
    pub down_count: usize,
    pub pending_count: usize,
    pub total_checks: usize,
    /// Mean of per-monitor uptime ratios over retained history, in percent.
    /// Monitors without history count as fully up.
    pub avg_uptime: f64,
    pub latency: Vec<LatencySample>,
}

fn uptime_ratio(monitor: &Monitor) -> f64 {
    if monitor.history.is_empty() {
        return 1.0;
    }
    let up = monitor.history.iter().filter(|h| h.status == CheckStatus::Up).count();
    up as f64 / monitor.history.len() as f64
}

pub fn fleet_report(monitors: &[Monitor]) -> FleetReport {
    let count = |status: MonitorStatus| monitors.iter().filter(|m| m.status == status).count();

    let avg_uptime = if monitors.is_empty() {
        100.0
    } else {
        let sum: f64 = monitors.iter().map(uptime_ratio).sum();
        (sum / monitors.len() as f64 * 1000.0).round() / 10.0
    };

    FleetReport {
        total_monitors: monitors.len(),
        up_count: count(MonitorStatus::Up),
        down_count: count(MonitorStatus::Down),
        pending_count: count(MonitorStatus::Pending),
        total_checks: monitors.iter().map(|m| m.history.len()).sum(),
        avg_uptime,
        latency: monitors
            .iter()
            .map(|m| LatencySample {
                monitor_id: m.id.clone(),
                name: m.name.clone(),
                status: m.status,
                latency: m.latest().map_or(0, |h| h.latency),
            })
            .collect(),
    }
}
