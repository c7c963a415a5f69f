#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vigil_service::clock::{FixedClock, SequentialIds};
use vigil_service::database::{Database, MemoryDatabase};
use vigil_service::monitoring::{ProbeKind, ProbeOutcome, ProbeResponse, Prober};
use vigil_service::{Config, Monitor, MonitorService, StoreError};

pub const NOW: i64 = 1_700_000_000_000;

/// Prober answering from a per-URL script
#[derive(Default)]
pub struct ScriptedProber {
    outcomes: Mutex<HashMap<String, ProbeOutcome>>,
    calls: AtomicUsize,
}

impl ScriptedProber {
    pub fn set(&self, url: &str, outcome: ProbeOutcome) {
        self.outcomes.lock().unwrap().insert(url.to_string(), outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn fetch(&self, url: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| ProbeOutcome::new(3, ProbeKind::Transport("dns error".into())))
    }
}

pub fn up(latency_ms: u64) -> ProbeOutcome {
    ProbeOutcome::new(
        latency_ms,
        ProbeKind::Response(ProbeResponse {
            status_code: 200,
            reason: Some("OK".into()),
            content_type: Some("text/html".into()),
            body: Some("<html>all good</html>".into()),
        }),
    )
}

pub fn server_error() -> ProbeOutcome {
    ProbeOutcome::new(
        40,
        ProbeKind::Response(ProbeResponse {
            status_code: 500,
            reason: Some("Internal Server Error".into()),
            content_type: Some("text/html".into()),
            body: None,
        }),
    )
}

pub fn timed_out() -> ProbeOutcome {
    ProbeOutcome::new(10_000, ProbeKind::TimedOut(Duration::from_secs(10)))
}

/// Store that fails every update for one id
pub struct FailingDatabase {
    pub inner: MemoryDatabase,
    pub broken_id: String,
}

#[async_trait]
impl Database for FailingDatabase {
    async fn get_monitor(&self, id: &str) -> Result<Option<Monitor>, StoreError> {
        self.inner.get_monitor(id).await
    }

    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError> {
        self.inner.list_monitors().await
    }

    async fn insert_monitor(&self, monitor: &Monitor) -> Result<(), StoreError> {
        self.inner.insert_monitor(monitor).await
    }

    async fn update_monitor(&self, monitor: &Monitor) -> Result<(), StoreError> {
        if monitor.id == self.broken_id {
            return Err(StoreError::Pool("disk full".into()));
        }
        self.inner.update_monitor(monitor).await
    }

    async fn delete_monitor(&self, id: &str) -> Result<bool, StoreError> {
        self.inner.delete_monitor(id).await
    }
}

pub struct Harness {
    pub service: MonitorService,
    pub database: Arc<dyn Database>,
    pub prober: Arc<ScriptedProber>,
    pub clock: Arc<FixedClock>,
}

pub fn harness_with(database: Arc<dyn Database>, mut config: Config) -> Harness {
    let _ = tracing_subscriber::fmt::try_init();

    config.storage.seed_demo_data = false;
    let prober = Arc::new(ScriptedProber::default());
    let clock = Arc::new(FixedClock::new(NOW));
    let service = MonitorService::with_parts(
        &config,
        Arc::clone(&database),
        prober.clone(),
        clock.clone(),
        Arc::new(SequentialIds::new("id")),
    );

    Harness { service, database, prober, clock }
}

pub fn harness() -> Harness {
    harness_with(Arc::new(MemoryDatabase::new()), Config::default())
}

impl Harness {
    /// Store a monitor exactly as given, bypassing the service
    pub async fn put(&self, monitor: &Monitor) {
        self.database.insert_monitor(monitor).await.unwrap();
    }

    pub async fn fetch(&self, id: &str) -> Monitor {
        self.service.get_monitor(id).await.unwrap()
    }
}
