use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;
use vigil_service::{MonitorPatch, MonitorService, NewMonitor};

use super::success;
use crate::error::ApiError;

// `sync_monitors` goes before the `{id}` routes so "sync" is never taken as an id.
macros_utils::routes! {
    route sync_monitors,
    route list_monitors,
    route create_monitor,
    route get_monitor,
    route update_monitor,
    route check_monitor,
    route delete_monitor,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckQuery {
    #[serde(default)]
    simulate_failure: bool,
}

#[get("/api/monitors")]
pub async fn list_monitors(service: web::Data<MonitorService>) -> Result<HttpResponse, ApiError> {
    Ok(success(service.list_monitors().await?))
}

#[post("/api/monitors")]
pub async fn create_monitor(
    service: web::Data<MonitorService>,
    body: web::Json<NewMonitor>,
) -> Result<HttpResponse, ApiError> {
    Ok(success(service.create_monitor(body.into_inner()).await?))
}

#[get("/api/monitors/{id}")]
pub async fn get_monitor(
    service: web::Data<MonitorService>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(success(service.get_monitor(&id).await?))
}

#[put("/api/monitors/{id}")]
pub async fn update_monitor(
    service: web::Data<MonitorService>,
    id: web::Path<String>,
    body: web::Json<MonitorPatch>,
) -> Result<HttpResponse, ApiError> {
    Ok(success(service.update_monitor(&id, body.into_inner()).await?))
}

/// Manual check. `?simulate_failure=true` records a drill failure without
/// touching the network.
#[post("/api/monitors/{id}/check")]
pub async fn check_monitor(
    service: web::Data<MonitorService>,
    id: web::Path<String>,
    query: web::Query<CheckQuery>,
) -> Result<HttpResponse, ApiError> {
    Ok(success(service.check_monitor(&id, query.simulate_failure).await?))
}

#[post("/api/monitors/sync")]
pub async fn sync_monitors(service: web::Data<MonitorService>) -> Result<HttpResponse, ApiError> {
    Ok(success(service.sync_all().await?))
}

#[delete("/api/monitors/{id}")]
pub async fn delete_monitor(
    service: web::Data<MonitorService>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let deleted = service.delete_monitor(&id).await?;
    Ok(success(json!({ "id": id.into_inner(), "deleted": deleted })))
}
