use async_trait::async_trait;
use libsql::params;

use super::Database;
use crate::error::StoreError;
use crate::models::Monitor;
use crate::pool::LibsqlPool;

/// LibSQL database implementation storing each monitor as a JSON document
pub struct DatabaseImpl {
    pool: LibsqlPool,
}

impl DatabaseImpl {
    /// Create a new database instance from a pool
    pub fn new_from_pool(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    /// Open the file at `path`, run migrations and return the store
    pub async fn open(path: &str, pool_size: usize) -> anyhow::Result<Self> {
        let pool = crate::pool::open_pool(path, pool_size).await?;
        let conn = pool.get().await.map_err(|e| anyhow::anyhow!("{e}"))?;
        super::initialize_database(&*conn).await?;
        drop(conn);
        Ok(Self::new_from_pool(pool))
    }

    /// Get a connection from the pool
    async fn get_conn(
        &self,
    ) -> Result<deadpool::managed::Object<crate::pool::LibsqlManager>, StoreError> {
        self.pool.get().await.map_err(|e| StoreError::Pool(e.to_string()))
    }
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl Database for DatabaseImpl {
    async fn get_monitor(&self, id: &str) -> Result<Option<Monitor>, StoreError> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query("SELECT document FROM monitors WHERE uuid = ?", params![id])
            .await?;

        match rows.next().await? {
            Some(row) => {
                let document: String = row.get(0)?;
                Ok(Some(serde_json::from_str(&document)?))
            }
            None => Ok(None),
        }
    }

    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError> {
        let conn = self.get_conn().await?;
        let mut rows = conn.query("SELECT document FROM monitors ORDER BY seq ASC", ()).await?;

        let mut monitors = Vec::new();
        while let Some(row) = rows.next().await? {
            let document: String = row.get(0)?;
            monitors.push(serde_json::from_str(&document)?);
        }

        Ok(monitors)
    }

    async fn insert_monitor(&self, monitor: &Monitor) -> Result<(), StoreError> {
        let conn = self.get_conn().await?;
        let document = serde_json::to_string(monitor)?;
        let now = now_secs();

        let inserted = conn
            .execute(
                "INSERT INTO monitors (uuid, document, created_at, updated_at) VALUES (?, ?, ?, ?)
                 ON CONFLICT(uuid) DO NOTHING",
                params![monitor.id.as_str(), document, now, now],
            )
            .await?;

        if inserted == 0 {
            return Err(StoreError::Conflict(monitor.id.clone()));
        }
        Ok(())
    }

    async fn update_monitor(&self, monitor: &Monitor) -> Result<(), StoreError> {
        let conn = self.get_conn().await?;
        let document = serde_json::to_string(monitor)?;

        let updated = conn
            .execute(
                "UPDATE monitors SET document = ?, updated_at = ? WHERE uuid = ?",
                params![document, now_secs(), monitor.id.as_str()],
            )
            .await?;

        if updated == 0 {
            return Err(StoreError::NotFound(monitor.id.clone()));
        }
        Ok(())
    }

    async fn delete_monitor(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.get_conn().await?;
        let deleted = conn.execute("DELETE FROM monitors WHERE uuid = ?", params![id]).await?;
        Ok(deleted > 0)
    }
}
