use actix_web::{HttpResponse, Responder, get};

/// Liveness check, an empty 200 means the process is serving
#[get("/")]
pub async fn health_route() -> impl Responder {
    HttpResponse::Ok().finish()
}
