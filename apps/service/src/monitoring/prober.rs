use anyhow::Result;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

use super::types::{ProbeKind, ProbeOutcome, ProbeResponse};
use crate::config::ProbeSettings;

/// Executes a single probe against a URL
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Send one request and report what happened. Never fails: transport
    /// problems are part of the outcome.
    async fn fetch(&self, url: &str) -> ProbeOutcome;

    /// Probe `url`, or fabricate a failure without touching the network
    /// when `simulate_failure` is set.
    async fn probe(&self, url: &str, simulate_failure: bool) -> ProbeOutcome {
        if simulate_failure {
            let start = Instant::now();
            return ProbeOutcome::new(elapsed_ms(start), ProbeKind::Simulated);
        }
        self.fetch(url).await
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// HTTP/HTTPS prober
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpProber {
    pub fn new(settings: &ProbeSettings) -> Result<Self> {
        let timeout = settings.timeout();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(&settings.accept)?);

        // The client timeout is a backstop; the outer `tokio::time::timeout`
        // is what cancels the request.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, timeout, max_body_bytes: settings.max_body_bytes })
    }

    async fn fetch_response(&self, url: &str) -> Result<ProbeResponse, reqwest::Error> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut probe = ProbeResponse {
            status_code: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            content_type,
            body: None,
        };

        if probe.is_success() && probe.is_text() {
            probe.body = Some(self.read_body(&mut response).await?);
        }

        Ok(probe)
    }

    /// Read at most `max_body_bytes` of the body
    async fn read_body(&self, response: &mut reqwest::Response) -> Result<String, reqwest::Error> {
        let mut buf = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buf.extend_from_slice(&chunk);
            if buf.len() >= self.max_body_bytes {
                buf.truncate(self.max_body_bytes);
                break;
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn fetch(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();

        // Dropping the request future on expiry aborts the connection.
        let kind = match timeout(self.timeout, self.fetch_response(url)).await {
            Ok(Ok(response)) => ProbeKind::Response(response),
            Ok(Err(e)) if e.is_timeout() => ProbeKind::TimedOut(self.timeout),
            Ok(Err(e)) => ProbeKind::Transport(describe_error(&e)),
            Err(_) => ProbeKind::TimedOut(self.timeout),
        };

        let outcome = ProbeOutcome::new(elapsed_ms(start), kind);
        debug!(url, latency_ms = outcome.latency_ms, status_code = ?outcome.status_code(), "Probe finished");
        outcome
    }
}

/// Flatten an error and its sources into one line
fn describe_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    if message.trim().is_empty() { "Connection Failed".to_string() } else { message }
}
