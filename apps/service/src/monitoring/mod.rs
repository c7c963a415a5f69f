//! Health-check engine
//!
//! This module is responsible for:
//! - Probing HTTP endpoints with a hard timeout
//! - Classifying outcomes as UP or DOWN, including "fake 200" pages
//! - Deciding which results become history entries
//! - Sweeping the fleet for monitors that are due

pub mod classifier;
pub mod executor;
pub mod prober;
pub mod recorder;
pub mod scheduler;
pub mod types;

pub use classifier::FailureClassifier;
pub use executor::MonitoringExecutor;
pub use prober::{HttpProber, Prober};
pub use recorder::{HistoryRecorder, WritePolicy};
pub use scheduler::{MonitoringScheduler, is_due};
pub use types::{CheckOutcome, ProbeKind, ProbeOutcome, ProbeResponse, RecordAction, Verdict};
