//! Endpoint availability engine.
//!
//! Probes HTTP endpoints, classifies each probe as UP or DOWN and keeps a
//! bounded, newest-first history per monitor while skipping history writes
//! that carry no new information.

pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod monitoring;
pub mod pool;
pub mod registry;
pub mod reports;
pub mod seed;
pub mod service;
pub mod validation;

pub use config::Config;
pub use error::{ServiceError, StoreError};
pub use models::{CheckStatus, Monitor, MonitorHistory, MonitorStatus};
pub use service::{MonitorPatch, MonitorService, NewMonitor};
