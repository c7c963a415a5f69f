use actix_web::{HttpResponse, get, web};
use vigil_service::MonitorService;

use super::success;
use crate::error::ApiError;

macros_utils::routes! {
    route fleet_report,
}

/// Fleet summary over the current monitor state
#[get("/api/reports")]
pub async fn fleet_report(service: web::Data<MonitorService>) -> Result<HttpResponse, ApiError> {
    Ok(success(service.report().await?))
}
