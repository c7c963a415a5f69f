#![warn(clippy::all, clippy::pedantic)]

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use tracing::info;
use vigil_service::{Config, MonitorService, database};

mod error;
mod routes;

use error::AppError;
use logger::init_tracing;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_config(env::var_os("VIGIL_CONFIG"))?;
    info!("{config}");

    let database = database::open(&config.storage).await?;
    let service = Arc::new(MonitorService::from_config(&config, database)?);

    if config.scheduler.enabled {
        let period = Duration::from_secs(config.scheduler.sweep_interval_seconds);
        let _sweeper = service.scheduler().start(period);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    run_server(addr, web::Data::from(service)).await
}

async fn run_server(addr: SocketAddr, service: web::Data<MonitorService>) -> Result<(), AppError> {
    info!("Listening on {addr}");
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .configure(routes::extractor_configs)
            .configure(routes::routes)
    })
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
