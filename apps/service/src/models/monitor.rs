use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of history entries retained per monitor
pub const HISTORY_CAPACITY: usize = 50;

/// Default check interval in minutes
pub const DEFAULT_INTERVAL_MINUTES: u32 = 5;

/// Monitor-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonitorStatus {
    Up,
    Down,
    Pending,
    Maintenance,
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStatus::Up => write!(f, "UP"),
            MonitorStatus::Down => write!(f, "DOWN"),
            MonitorStatus::Pending => write!(f, "PENDING"),
            MonitorStatus::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

/// Status recorded on a single history entry. `PENDING` and `MAINTENANCE`
/// only exist at the monitor level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Up,
    Down,
}

impl From<CheckStatus> for MonitorStatus {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Up => MonitorStatus::Up,
            CheckStatus::Down => MonitorStatus::Down,
        }
    }
}

impl PartialEq<CheckStatus> for MonitorStatus {
    fn eq(&self, other: &CheckStatus) -> bool {
        *self == MonitorStatus::from(*other)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        MonitorStatus::from(*self).fmt(f)
    }
}

/// One probe record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorHistory {
    pub id: String,

    /// Epoch milliseconds when the probe completed
    pub timestamp: i64,

    /// Elapsed milliseconds, always 0 for `DOWN`
    pub latency: u64,

    pub status: CheckStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// A tracked endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: String,
    pub name: String,
    pub url: String,

    /// Minutes between scheduled checks
    pub interval: u32,

    pub status: MonitorStatus,

    /// Epoch milliseconds of the latest check attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<i64>,

    /// Newest first, at most [`HISTORY_CAPACITY`] entries
    #[serde(default)]
    pub history: Vec<MonitorHistory>,
}

impl Monitor {
    /// Create a fresh monitor in the `PENDING` state with no history
    pub fn new(id: String, name: String, url: String, interval: u32) -> Self {
        Self {
            id,
            name,
            url,
            interval,
            status: MonitorStatus::Pending,
            last_checked: None,
            history: Vec::new(),
        }
    }

    /// Interval converted to milliseconds
    pub fn interval_ms(&self) -> i64 {
        i64::from(self.interval) * 60_000
    }

    /// Most recent history entry, if any
    pub fn latest(&self) -> Option<&MonitorHistory> {
        self.history.first()
    }
}

/// Prefix `https://` when the URL carries no http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com/health "), "https://example.com/health");
    }

    #[test]
    fn test_normalize_url_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
    }

    #[test]
    fn test_normalize_url_host_starting_with_http() {
        assert_eq!(normalize_url("httpbin.org/get"), "https://httpbin.org/get");
    }

    #[test]
    fn test_monitor_serializes_camel_case() {
        let mut monitor = Monitor::new(
            "m1".to_string(),
            "Example".to_string(),
            "https://example.com".to_string(),
            5,
        );
        monitor.last_checked = Some(42);
        monitor.history.push(MonitorHistory {
            id: "h1".to_string(),
            timestamp: 42,
            latency: 0,
            status: CheckStatus::Down,
            message: Some("HTTP Error: 500 Internal Server Error".to_string()),
            status_code: Some(500),
        });

        let json = serde_json::to_value(&monitor).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["lastChecked"], 42);
        assert_eq!(json["history"][0]["statusCode"], 500);
        assert_eq!(json["history"][0]["status"], "DOWN");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let monitor = Monitor::new("m1".into(), "a".into(), "https://a.dev".into(), 1);
        let json = serde_json::to_value(&monitor).unwrap();
        assert!(json.get("lastChecked").is_none());
        assert_eq!(json["history"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_monitor_status_matches_check_status() {
        assert!(MonitorStatus::Up == CheckStatus::Up);
        assert!(MonitorStatus::Pending != CheckStatus::Up);
        assert!(MonitorStatus::Maintenance != CheckStatus::Down);
    }
}
