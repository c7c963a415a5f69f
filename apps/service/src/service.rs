//! Monitor operations exposed to the routing layer.

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::config::Config;
use crate::database::Database;
use crate::error::ServiceError;
use crate::models::{DEFAULT_INTERVAL_MINUTES, Monitor, normalize_url};
use crate::monitoring::{
    CheckOutcome, FailureClassifier, HistoryRecorder, HttpProber, MonitoringExecutor,
    MonitoringScheduler, Prober,
};
use crate::registry::MonitorRegistry;
use crate::reports::{FleetReport, fleet_report};
use crate::{seed, validation};

/// Body of a create request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMonitor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub interval: Option<u32>,
}

/// Body of an update request. Blank strings leave the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub interval: Option<u32>,
}

pub struct MonitorService {
    registry: Arc<MonitorRegistry>,
    scheduler: Arc<MonitoringScheduler>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    seed_demo_data: bool,
    seed_lock: Mutex<()>,
}

impl MonitorService {
    /// Wire the engine with the system clock, UUIDs and the HTTP prober
    pub fn from_config(config: &Config, database: Arc<dyn Database>) -> anyhow::Result<Self> {
        let prober = Arc::new(HttpProber::new(&config.probe)?);
        Ok(Self::with_parts(config, database, prober, Arc::new(SystemClock), Arc::new(UuidGenerator)))
    }

    /// Wire the engine from explicit collaborators
    pub fn with_parts(
        config: &Config,
        database: Arc<dyn Database>,
        prober: Arc<dyn Prober>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let registry = Arc::new(MonitorRegistry::new(database));
        let executor = Arc::new(MonitoringExecutor::new(
            prober,
            FailureClassifier::new(config.classifier.failure_patterns.iter().cloned()),
            Arc::clone(&clock),
            Arc::clone(&ids),
        ));
        let recorder = HistoryRecorder::new(config.history.capacity, config.history.heartbeat_ms());
        let scheduler = Arc::new(MonitoringScheduler::new(
            Arc::clone(&registry),
            executor,
            recorder,
            config.scheduler.max_concurrent_checks,
        ));

        Self {
            registry,
            scheduler,
            clock,
            ids,
            seed_demo_data: config.storage.seed_demo_data,
            seed_lock: Mutex::new(()),
        }
    }

    pub fn scheduler(&self) -> Arc<MonitoringScheduler> {
        Arc::clone(&self.scheduler)
    }

    /// Write the demo fleet if the store is empty
    async fn ensure_seed(&self) -> Result<(), ServiceError> {
        if !self.seed_demo_data {
            return Ok(());
        }

        let _guard = self.seed_lock.lock().await;
        if !self.registry.list().await?.is_empty() {
            return Ok(());
        }

        for monitor in seed::demo_monitors(self.clock.now_ms()) {
            self.registry.create(monitor).await?;
        }
        info!("Seeded demo monitors into empty store");
        Ok(())
    }

    pub async fn list_monitors(&self) -> Result<Vec<Monitor>, ServiceError> {
        self.ensure_seed().await?;
        Ok(self.registry.list().await?)
    }

    pub async fn get_monitor(&self, id: &str) -> Result<Monitor, ServiceError> {
        self.registry.get(id).await?.ok_or(ServiceError::NotFound)
    }

    pub async fn create_monitor(&self, request: NewMonitor) -> Result<Monitor, ServiceError> {
        let name = request.name.trim();
        if name.is_empty() || request.url.trim().is_empty() {
            return Err(ServiceError::BadRequest("name and url required".into()));
        }
        validation::validate_monitor_name(name).into_result()?;

        let url = normalize_url(&request.url);
        validation::validate_http_endpoint(&url).into_result()?;

        let interval = request.interval.unwrap_or(DEFAULT_INTERVAL_MINUTES);
        validation::validate_interval(interval).into_result()?;

        let monitor = Monitor::new(self.ids.next_id(), name.to_string(), url, interval);
        let monitor = self.registry.create(monitor).await?;
        info!(monitor_id = %monitor.id, url = %monitor.url, "Monitor created");
        Ok(monitor)
    }

    pub async fn update_monitor(&self, id: &str, patch: MonitorPatch) -> Result<Monitor, ServiceError> {
        let name = patch.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = name {
            validation::validate_monitor_name(name).into_result()?;
        }

        let url = patch.url.as_deref().filter(|u| !u.trim().is_empty()).map(normalize_url);
        if let Some(url) = &url {
            validation::validate_http_endpoint(url).into_result()?;
        }

        if let Some(interval) = patch.interval {
            validation::validate_interval(interval).into_result()?;
        }

        let name = name.map(str::to_string);
        let (updated, ()) = self
            .registry
            .mutate(id, move |mut monitor| {
                if let Some(name) = name {
                    monitor.name = name;
                }
                if let Some(url) = url {
                    monitor.url = url;
                }
                if let Some(interval) = patch.interval {
                    monitor.interval = interval;
                }
                (monitor, ())
            })
            .await?;
        Ok(updated)
    }

    /// Manual check, bypassing the due filter and write suppression
    pub async fn check_monitor(&self, id: &str, simulate_failure: bool) -> Result<Monitor, ServiceError> {
        Ok(self.scheduler.check_now(id, simulate_failure).await?)
    }

    /// Global sweep over every monitor
    pub async fn sync_all(&self) -> Result<Vec<CheckOutcome>, ServiceError> {
        Ok(self.scheduler.sweep().await?)
    }

    pub async fn delete_monitor(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.registry.delete(id).await?;
        if deleted {
            info!(monitor_id = id, "Monitor deleted");
        }
        Ok(deleted)
    }

    pub async fn report(&self) -> Result<FleetReport, ServiceError> {
        let monitors = self.registry.list().await?;
        Ok(fleet_report(&monitors))
    }
}
