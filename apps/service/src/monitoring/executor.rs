use std::sync::Arc;

use super::classifier::FailureClassifier;
use super::prober::Prober;
use crate::clock::{Clock, IdGenerator};
use crate::models::{Monitor, MonitorHistory};

/// Monitoring executor - probes a monitor and classifies the result
pub struct MonitoringExecutor {
    prober: Arc<dyn Prober>,
    classifier: FailureClassifier,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl MonitoringExecutor {
    pub fn new(
        prober: Arc<dyn Prober>,
        classifier: FailureClassifier,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { prober, classifier, clock, ids }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Probe the monitor's URL once and build its history record.
    /// The timestamp is taken after the probe completes.
    pub async fn execute_check(&self, monitor: &Monitor, simulate_failure: bool) -> MonitorHistory {
        let outcome = self.prober.probe(&monitor.url, simulate_failure).await;
        self.classifier.classify(&outcome, self.ids.next_id(), self.clock.now_ms())
    }
}
