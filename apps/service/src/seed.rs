use crate::models::{CheckStatus, Monitor, MonitorHistory, MonitorStatus};

fn entry(id: &str, timestamp: i64, latency: u64, status: CheckStatus, message: Option<&str>) -> MonitorHistory {
    MonitorHistory {
        id: id.to_string(),
        timestamp,
        latency,
        status,
        message: message.map(str::to_string),
        status_code: None,
    }
}

/// Demo fleet written into an empty store on first listing
pub fn demo_monitors(now: i64) -> Vec<Monitor> {
    vec![
        Monitor {
            id: "mon-1".into(),
            name: "Google Search".into(),
            url: "https://www.google.com".into(),
            interval: 1,
            status: MonitorStatus::Up,
            last_checked: Some(now),
            history: vec![
                entry("h1", now - 300_000, 120, CheckStatus::Up, None),
                entry("h2", now - 600_000, 145, CheckStatus::Up, None),
                entry("h3", now - 900_000, 110, CheckStatus::Up, None),
            ],
        },
        Monitor {
            id: "mon-2".into(),
            name: "Vigilant API".into(),
            url: "https://api.vigilant.io/health".into(),
            interval: 5,
            status: MonitorStatus::Down,
            last_checked: Some(now),
            history: vec![
                entry("h4", now - 300_000, 0, CheckStatus::Down, Some("DNS Resolution Error")),
                entry("h5", now - 600_000, 450, CheckStatus::Up, None),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_monitors_hold_invariants() {
        for monitor in demo_monitors(1_000_000) {
            assert!(monitor.url.starts_with("https://"));
            assert_eq!(monitor.status, monitor.history[0].status);
            assert!(monitor.history.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
            assert!(monitor.history.iter().all(|h| h.status == CheckStatus::Up || h.latency == 0));
        }
    }
}
