//! UP/DOWN classification of probe outcomes.
//!
//! Decision order:
//! 1. transport failure, timeout or drill → `DOWN` with the probe's reason
//! 2. non-2xx status → `DOWN`, `HTTP Error: <code> <reason>`
//! 3. 2xx with a text body containing a failure signature → `DOWN`,
//!    `Pattern Match: <signature>`
//! 4. otherwise `UP`

use super::types::{ProbeKind, ProbeOutcome, Verdict};
use crate::models::MonitorHistory;

/// Reason recorded for drills
pub const SIMULATED_OUTAGE: &str = "Simulated Outage (Drill)";

/// Status code recorded for drills
pub const SIMULATED_STATUS_CODE: u16 = 503;

/// Body substrings that reveal an error page served with a 2xx status
pub const DEFAULT_FAILURE_PATTERNS: [&str; 6] = [
    "maintenance mode",
    "sql error",
    "connection failed",
    "database error",
    "site under maintenance",
    "access denied",
];

#[derive(Debug, Clone)]
pub struct FailureClassifier {
    /// Lowercase, checked in order
    patterns: Vec<String>,
}

impl Default for FailureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_PATTERNS.iter().map(|p| p.to_string()))
    }
}

impl FailureClassifier {
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        let patterns = patterns
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn verdict(&self, outcome: &ProbeOutcome) -> Verdict {
        match &outcome.kind {
            ProbeKind::Simulated => Verdict::down(SIMULATED_OUTAGE, Some(SIMULATED_STATUS_CODE)),
            ProbeKind::TimedOut(after) => {
                Verdict::down(format!("Timeout (>{}s)", after.as_secs()), None)
            }
            ProbeKind::Transport(reason) if reason.trim().is_empty() => {
                Verdict::down("Connection Failed", None)
            }
            ProbeKind::Transport(reason) => Verdict::down(reason.clone(), None),
            ProbeKind::Response(response) => {
                let code = Some(response.status_code);
                if !response.is_success() {
                    let message = match response.reason.as_deref() {
                        Some(reason) => format!("HTTP Error: {} {}", response.status_code, reason),
                        None => format!("HTTP Error: {}", response.status_code),
                    };
                    return Verdict::down(message, code);
                }

                if response.is_text() {
                    if let Some(pattern) = response.body.as_deref().and_then(|b| self.find_pattern(b)) {
                        return Verdict::down(format!("Pattern Match: {pattern}"), code);
                    }
                }

                Verdict::up(code)
            }
        }
    }

    /// Classify `outcome` into a fresh history record
    pub fn classify(&self, outcome: &ProbeOutcome, id: String, timestamp: i64) -> MonitorHistory {
        self.verdict(outcome).into_history(id, timestamp, outcome.latency_ms)
    }

    fn find_pattern(&self, body: &str) -> Option<&str> {
        let body = body.to_lowercase();
        self.patterns.iter().find(|p| body.contains(p.as_str())).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckStatus;
    use crate::monitoring::types::ProbeResponse;
    use std::time::Duration;

    fn response(code: u16, reason: Option<&str>, content_type: Option<&str>, body: Option<&str>) -> ProbeOutcome {
        ProbeOutcome::new(
            120,
            ProbeKind::Response(ProbeResponse {
                status_code: code,
                reason: reason.map(str::to_string),
                content_type: content_type.map(str::to_string),
                body: body.map(str::to_string),
            }),
        )
    }

    #[test]
    fn test_simulated_failure() {
        let entry = FailureClassifier::default().classify(
            &ProbeOutcome::new(0, ProbeKind::Simulated),
            "h1".into(),
            1_000,
        );
        assert_eq!(entry.status, CheckStatus::Down);
        assert_eq!(entry.message.as_deref(), Some("Simulated Outage (Drill)"));
        assert_eq!(entry.status_code, Some(503));
        assert_eq!(entry.latency, 0);
        assert_eq!(entry.timestamp, 1_000);
        assert_eq!(entry.id, "h1");
    }

    #[test]
    fn test_timeout_message() {
        let outcome = ProbeOutcome::new(10_001, ProbeKind::TimedOut(Duration::from_secs(10)));
        let verdict = FailureClassifier::default().verdict(&outcome);
        assert_eq!(verdict.message.as_deref(), Some("Timeout (>10s)"));
        assert_eq!(verdict.status_code, None);
    }

    #[test]
    fn test_transport_failure_uses_reason() {
        let outcome = ProbeOutcome::new(5, ProbeKind::Transport("dns error: no such host".into()));
        let verdict = FailureClassifier::default().verdict(&outcome);
        assert_eq!(verdict.status, CheckStatus::Down);
        assert_eq!(verdict.message.as_deref(), Some("dns error: no such host"));
    }

    #[test]
    fn test_transport_failure_without_reason() {
        let outcome = ProbeOutcome::new(5, ProbeKind::Transport(String::new()));
        let verdict = FailureClassifier::default().verdict(&outcome);
        assert_eq!(verdict.message.as_deref(), Some("Connection Failed"));
    }

    #[test]
    fn test_http_error_status() {
        let outcome = response(503, Some("Service Unavailable"), Some("text/html"), None);
        let entry = FailureClassifier::default().classify(&outcome, "h".into(), 0);
        assert_eq!(entry.status, CheckStatus::Down);
        assert_eq!(entry.message.as_deref(), Some("HTTP Error: 503 Service Unavailable"));
        assert_eq!(entry.status_code, Some(503));
        assert_eq!(entry.latency, 0);
    }

    #[test]
    fn test_http_error_without_reason_phrase() {
        let outcome = response(599, None, None, None);
        let verdict = FailureClassifier::default().verdict(&outcome);
        assert_eq!(verdict.message.as_deref(), Some("HTTP Error: 599"));
    }

    #[test]
    fn test_fake_200_detected_case_insensitive() {
        let outcome = response(
            200,
            Some("OK"),
            Some("text/html"),
            Some("<h1>Site Under MAINTENANCE</h1>"),
        );
        let verdict = FailureClassifier::default().verdict(&outcome);
        assert_eq!(verdict.status, CheckStatus::Down);
        assert_eq!(verdict.message.as_deref(), Some("Pattern Match: site under maintenance"));
        assert_eq!(verdict.status_code, Some(200));
    }

    #[test]
    fn test_first_pattern_in_list_order_wins() {
        let outcome = response(
            200,
            Some("OK"),
            Some("text/plain"),
            Some("access denied after a database error"),
        );
        let verdict = FailureClassifier::default().verdict(&outcome);
        assert_eq!(verdict.message.as_deref(), Some("Pattern Match: database error"));
    }

    #[test]
    fn test_non_text_body_not_scanned() {
        let outcome = response(
            200,
            Some("OK"),
            Some("application/json"),
            Some("{\"error\": \"sql error\"}"),
        );
        let entry = FailureClassifier::default().classify(&outcome, "h".into(), 0);
        assert_eq!(entry.status, CheckStatus::Up);
        assert_eq!(entry.latency, 120);
        assert_eq!(entry.message, None);
    }

    #[test]
    fn test_healthy_response() {
        let outcome = response(204, Some("No Content"), None, None);
        let entry = FailureClassifier::default().classify(&outcome, "h".into(), 0);
        assert_eq!(entry.status, CheckStatus::Up);
        assert_eq!(entry.status_code, Some(204));
        assert_eq!(entry.latency, 120);
    }

    #[test]
    fn test_custom_patterns_are_lowercased() {
        let classifier = FailureClassifier::new(vec!["  Out Of Order ".to_string(), String::new()]);
        assert_eq!(classifier.patterns(), ["out of order"]);

        let outcome = response(200, Some("OK"), Some("text/html"), Some("OUT OF ORDER"));
        assert_eq!(classifier.verdict(&outcome).status, CheckStatus::Down);
    }
}
