use serde::Serialize;
use std::time::Duration;

use crate::models::{CheckStatus, MonitorHistory};

/// What came back from the target, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeKind {
    /// A drill; no request was sent
    Simulated,

    /// The request was cancelled after the probe timeout
    TimedOut(Duration),

    /// DNS, connect, TLS or any other transport error
    Transport(String),

    /// A response was received (after following redirects)
    Response(ProbeResponse),
}

/// Final response of a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,

    /// Canonical reason phrase for the status code, if one exists
    pub reason: Option<String>,

    pub content_type: Option<String>,

    /// Only read for successful responses with a text content type
    pub body: Option<String>,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_text(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| ct.contains("text"))
    }
}

/// Result of one probe with its wall-clock latency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub latency_ms: u64,
    pub kind: ProbeKind,
}

impl ProbeOutcome {
    pub fn new(latency_ms: u64, kind: ProbeKind) -> Self {
        Self { latency_ms, kind }
    }

    pub fn status_code(&self) -> Option<u16> {
        match &self.kind {
            ProbeKind::Response(response) => Some(response.status_code),
            _ => None,
        }
    }
}

/// Classification of a probe outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: CheckStatus,
    pub message: Option<String>,
    pub status_code: Option<u16>,
}

impl Verdict {
    pub fn up(status_code: Option<u16>) -> Self {
        Self { status: CheckStatus::Up, message: None, status_code }
    }

    pub fn down(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self { status: CheckStatus::Down, message: Some(message.into()), status_code }
    }

    /// Turn the verdict into a history record. Latency is only kept for `UP`.
    pub fn into_history(self, id: String, timestamp: i64, latency_ms: u64) -> MonitorHistory {
        let latency = match self.status {
            CheckStatus::Up => latency_ms,
            CheckStatus::Down => 0,
        };
        MonitorHistory {
            id,
            timestamp,
            latency,
            status: self.status,
            message: self.message,
            status_code: self.status_code,
        }
    }
}

/// Per-monitor line of a sweep report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub monitor_id: String,
    pub name: String,
    pub checked: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckOutcome {
    pub fn skipped(monitor_id: String, name: String) -> Self {
        Self { monitor_id, name, checked: false, status: None, latency: None, error: None }
    }

    pub fn checked(monitor_id: String, name: String, entry: &MonitorHistory) -> Self {
        Self {
            monitor_id,
            name,
            checked: true,
            status: Some(entry.status),
            latency: Some(entry.latency),
            error: None,
        }
    }

    pub fn failed(monitor_id: String, name: String, error: String) -> Self {
        Self { monitor_id, name, checked: true, status: None, latency: None, error: Some(error) }
    }
}

/// What the recorder did with a check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    /// A history entry was written
    Persisted,
    /// Only `lastChecked` moved
    Refreshed,
}
