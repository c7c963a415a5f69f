use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use vigil_service::ServiceError;

use crate::error::ApiError;

mod health;
mod monitors;
mod reports;

use health::health_route;

macros_utils::routes! {
    route health_route,
    module monitors,
    module reports,
}

/// Body and query extractor failures answer with the error envelope
pub(crate) fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError(ServiceError::BadRequest(format!("Invalid request body: {err}"))).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError(ServiceError::BadRequest(format!("Invalid query: {err}"))).into()
    }));
}

/// Success half of the JSON envelope
pub(crate) fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data }))
}
