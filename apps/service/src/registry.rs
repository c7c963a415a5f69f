//! Serialized access to monitor state.
//!
//! Every read-modify-write of a monitor holds an async mutex keyed by the
//! monitor id for the full fetch → transform → write cycle. Mutations of
//! different monitors never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use crate::database::Database;
use crate::error::StoreError;
use crate::models::Monitor;

/// One async mutex per key, created on first use
#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry for `key`. Holders of an existing guard keep it.
    pub fn forget(&self, key: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(key);
    }

    /// Release `guard` and drop the entry for `key` unless another task
    /// still holds or waits on it.
    pub fn release_idle(&self, key: &str, guard: OwnedMutexGuard<()>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(guard);
        if locks.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entity store with atomic per-id mutation on top of a raw [`Database`]
pub struct MonitorRegistry {
    database: Arc<dyn Database>,
    locks: KeyedLocks,
}

impl MonitorRegistry {
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self { database, locks: KeyedLocks::new() }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Monitor>, StoreError> {
        self.database.get_monitor(id).await
    }

    pub async fn list(&self) -> Result<Vec<Monitor>, StoreError> {
        self.database.list_monitors().await
    }

    pub async fn create(&self, monitor: Monitor) -> Result<Monitor, StoreError> {
        let guard = self.locks.acquire(&monitor.id).await;
        if let Err(e) = self.database.insert_monitor(&monitor).await {
            self.locks.release_idle(&monitor.id, guard);
            return Err(e);
        }
        Ok(monitor)
    }

    /// Apply `f` to the current state of `id` and persist the result.
    ///
    /// `f` also returns a side value, handy for reporting which branch a
    /// decision took. The id is immutable; changing it is a conflict.
    pub async fn mutate<F, T>(&self, id: &str, f: F) -> Result<(Monitor, T), StoreError>
    where
        F: FnOnce(Monitor) -> (Monitor, T) + Send,
        T: Send,
    {
        let guard = self.locks.acquire(id).await;

        let current = match self.database.get_monitor(id).await {
            Ok(Some(current)) => current,
            // No entry is kept for ids that are not stored.
            Ok(None) => {
                self.locks.release_idle(id, guard);
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => {
                self.locks.release_idle(id, guard);
                return Err(e);
            }
        };

        let (next, output) = f(current);
        if next.id != id {
            return Err(StoreError::Conflict(id.to_string()));
        }

        self.database.update_monitor(&next).await?;
        Ok((next, output))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = {
            let _guard = self.locks.acquire(id).await;
            self.database.delete_monitor(id).await?
        };
        self.locks.forget(id);
        debug!(monitor_id = id, deleted, "Monitor delete");
        Ok(deleted)
    }
}
