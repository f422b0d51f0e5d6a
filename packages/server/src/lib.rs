#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the SafeRoute crime map.
//!
//! Serves `/api/crime` (recent Chicago incidents, classified and counted),
//! `/api/health`, and the static map frontend.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use saferoute_source::IncidentSource;
use saferoute_source::chicago::ChicagoSource;

pub use config::{ConfigError, ServerConfig};
pub use handlers::SERVICE_NAME;

/// Shared application state.
pub struct AppState {
    /// Upstream incident provider.
    pub source: Arc<dyn IncidentSource>,
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/crime", web::get().to(handlers::crime)),
    );
}

/// Starts the SafeRoute API server.
///
/// Builds the Chicago source from `config` and serves the API and the
/// frontend bundle until shutdown. The caller provides the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP client cannot be built,
/// the server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let source = ChicagoSource::new(config.app_token.clone()).map_err(std::io::Error::other)?;
    log::info!("Using data source {}", source.id());

    let state = web::Data::new(AppState {
        source: Arc::new(source),
    });

    let ServerConfig {
        bind_addr,
        port,
        static_dir,
        ..
    } = config;

    log::info!("Starting server on http://{bind_addr}:{port}");
    log::info!("Serving files from: {}", static_dir.display());
    log::info!("Health check available at: http://{bind_addr}:{port}/api/health");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
