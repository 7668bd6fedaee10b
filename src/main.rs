use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use mental_health_api::routes;
use mental_health_api::service::InferenceService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("Starting Student Mental Health Assessment API");

    let model_dir = PathBuf::from(std::env::var("MODEL_DIR").unwrap_or_else(|_| "models".into()));
    let service = match InferenceService::load(&model_dir) {
        Ok(service) => service,
        Err(err) => {
            // Refuse traffic rather than serve with missing or skewed artifacts.
            error!("Failed to load artifacts from {}: {err}", model_dir.display());
            std::process::exit(1);
        }
    };
    info!("Artifacts loaded from {}", model_dir.display());

    let service_data = web::Data::new(service);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8006".to_string());
    let workers = std::env::var("WORKERS")
        .ok()
        .and_then(|w| w.parse().ok())
        .unwrap_or_else(num_cpus::get);

    let bind_address = format!("{host}:{port}");

    info!("Server listening on http://{bind_address}");
    info!("Workers: {workers}");
    info!("Endpoints:");
    info!("   GET  /         - liveness probe");
    info!("   POST /predict  - mental health prediction");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(service_data.clone())
            .app_data(routes::json_config())
            .configure(routes::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run()
    .await
}
