//! Monitor persistence
//!
//! The engine treats storage as an external key-value object store: one
//! document per monitor id. Two backends implement [`Database`]: an
//! in-process map and a LibSQL (SQLite) file.

pub mod memory;
pub mod migrations;
pub mod repository;

pub use memory::MemoryDatabase;
pub use repository::DatabaseImpl;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{StorageBackend, StorageSettings};
use crate::error::StoreError;
use crate::models::Monitor;

/// Raw monitor storage. Callers that read-modify-write must go through
/// [`crate::registry::MonitorRegistry`] to get per-id serialization.
#[async_trait]
pub trait Database: Send + Sync {
    /// Fetch a monitor by id
    async fn get_monitor(&self, id: &str) -> Result<Option<Monitor>, StoreError>;

    /// All monitors in creation order
    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError>;

    /// Insert a new monitor, failing with `Conflict` if the id is taken
    async fn insert_monitor(&self, monitor: &Monitor) -> Result<(), StoreError>;

    /// Overwrite an existing monitor, failing with `NotFound` if absent
    async fn update_monitor(&self, monitor: &Monitor) -> Result<(), StoreError>;

    /// Remove a monitor and its history. Returns whether it existed.
    async fn delete_monitor(&self, id: &str) -> Result<bool, StoreError>;
}

/// Initialize database with schema
pub async fn initialize_database(conn: &libsql::Connection) -> anyhow::Result<()> {
    migrations::run_migrations(conn).await
}

/// Build the store selected in the storage settings
pub async fn open(settings: &StorageSettings) -> anyhow::Result<Arc<dyn Database>> {
    let database: Arc<dyn Database> = match settings.backend {
        StorageBackend::Memory => Arc::new(MemoryDatabase::new()),
        StorageBackend::Libsql => {
            Arc::new(DatabaseImpl::open(&settings.path, settings.pool_size.max(1)).await?)
        }
    };
    tracing::info!("Using {} monitor store", settings.backend);
    Ok(database)
}
