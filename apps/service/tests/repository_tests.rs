//! LibSQL store backed by a temporary file.

use anyhow::Result;
use std::sync::Arc;
use tempfile::tempdir;

use vigil_service::database::{Database, DatabaseImpl};
use vigil_service::models::{CheckStatus, Monitor, MonitorHistory, MonitorStatus};
use vigil_service::registry::MonitorRegistry;
use vigil_service::StoreError;

fn monitor(id: &str) -> Monitor {
    Monitor::new(id.into(), format!("{id} site"), format!("https://{id}.example"), 5)
}

async fn open_store(dir: &tempfile::TempDir) -> Result<DatabaseImpl> {
    let path = dir.path().join("monitors.db");
    DatabaseImpl::open(&path.to_string_lossy(), 2).await
}

#[tokio::test]
async fn test_insert_get_and_list_in_creation_order() -> Result<()> {
    let dir = tempdir()?;
    let db = open_store(&dir).await?;

    for id in ["b", "a", "c"] {
        db.insert_monitor(&monitor(id)).await?;
    }

    let fetched = db.get_monitor("a").await?.expect("monitor a");
    assert_eq!(fetched, monitor("a"));

    let ids: Vec<String> = db.list_monitors().await?.into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_insert_conflicts() -> Result<()> {
    let dir = tempdir()?;
    let db = open_store(&dir).await?;

    db.insert_monitor(&monitor("a")).await?;
    let err = db.insert_monitor(&monitor("a")).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn test_update_round_trips_history() -> Result<()> {
    let dir = tempdir()?;
    let db = open_store(&dir).await?;
    db.insert_monitor(&monitor("a")).await?;

    let mut updated = monitor("a");
    updated.status = MonitorStatus::Down;
    updated.last_checked = Some(1_700_000_000_000);
    updated.history.push(MonitorHistory {
        id: "h1".into(),
        timestamp: 1_700_000_000_000,
        latency: 0,
        status: CheckStatus::Down,
        message: Some("Pattern Match: sql error".into()),
        status_code: Some(200),
    });
    db.update_monitor(&updated).await?;

    assert_eq!(db.get_monitor("a").await?, Some(updated));
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_missing() -> Result<()> {
    let dir = tempdir()?;
    let db = open_store(&dir).await?;

    let err = db.update_monitor(&monitor("ghost")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(!db.delete_monitor("ghost").await?);
    Ok(())
}

#[tokio::test]
async fn test_data_survives_reopen() -> Result<()> {
    let dir = tempdir()?;
    {
        let db = open_store(&dir).await?;
        db.insert_monitor(&monitor("a")).await?;
    }

    // Migrations are idempotent on an existing file.
    let db = open_store(&dir).await?;
    assert!(db.get_monitor("a").await?.is_some());
    assert!(db.delete_monitor("a").await?);
    assert!(db.list_monitors().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_registry_mutate_over_libsql() -> Result<()> {
    let dir = tempdir()?;
    let registry = MonitorRegistry::new(Arc::new(open_store(&dir).await?));
    registry.create(monitor("a")).await?;

    let (renamed, previous) = registry
        .mutate("a", |mut m| {
            let previous = std::mem::replace(&mut m.name, "Renamed".into());
            (m, previous)
        })
        .await?;

    assert_eq!(previous, "a site");
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(registry.get("a").await?.map(|m| m.name), Some("Renamed".to_string()));
    Ok(())
}
