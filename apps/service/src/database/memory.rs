use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::Database;
use crate::error::StoreError;
use crate::models::Monitor;

#[derive(Default)]
struct Inner {
    next_seq: u64,
    monitors: HashMap<String, (u64, Monitor)>,
}

/// In-process store, listing in insertion order
#[derive(Default)]
pub struct MemoryDatabase {
    inner: RwLock<Inner>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn get_monitor(&self, id: &str) -> Result<Option<Monitor>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.monitors.get(id).map(|(_, monitor)| monitor.clone()))
    }

    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&(u64, Monitor)> = inner.monitors.values().collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, monitor)| monitor.clone()).collect())
    }

    async fn insert_monitor(&self, monitor: &Monitor) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.monitors.contains_key(&monitor.id) {
            return Err(StoreError::Conflict(monitor.id.clone()));
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.monitors.insert(monitor.id.clone(), (seq, monitor.clone()));
        Ok(())
    }

    async fn update_monitor(&self, monitor: &Monitor) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.monitors.get_mut(&monitor.id) {
            Some((_, stored)) => {
                *stored = monitor.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(monitor.id.clone())),
        }
    }

    async fn delete_monitor(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.monitors.remove(id).is_some())
    }
}
