#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the CENIPA occurrence dashboard.
//!
//! Serves the dashboard view description as JSON from `/api/dashboard` and
//! the browser page that renders it from `app/`. The occurrence table is
//! loaded once through a shared [`OccurrenceCache`] and every request
//! re-runs the filter and view composition against it.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use cenipa_map_source::cache::OccurrenceCache;
use cenipa_map_source::{HttpCsvSource, LoadError, dataset};

/// Shared application state.
pub struct AppState {
    /// Single-flight cache of the normalized occurrence table.
    pub cache: Arc<OccurrenceCache>,
}

/// Builds a cache for the embedded CENIPA dataset, downloading over HTTP.
///
/// # Errors
///
/// Returns [`LoadError::Definition`] if the embedded dataset definition is
/// invalid.
pub fn default_cache() -> Result<OccurrenceCache, LoadError> {
    let definition = dataset::cenipa()?;
    let source = HttpCsvSource::from_definition(&definition);
    log::info!("Occurrence data source: {}", source.url());
    Ok(OccurrenceCache::new(Arc::new(source), definition))
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/classifications", web::get().to(handlers::classifications))
            .route("/dashboard", web::get().to(handlers::dashboard)),
    );
}

/// Starts the dashboard server.
///
/// Loads the occurrence table before binding so that an unreachable data
/// source aborts startup. This is a regular async function; the caller
/// provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the initial load fails, or if the
/// HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(cache: Arc<OccurrenceCache>) -> std::io::Result<()> {
    log::info!("Loading occurrences...");
    let table = cache.load().await.map_err(std::io::Error::other)?;
    log::info!("Loaded {} occurrences", table.len());

    let state = web::Data::new(AppState { cache });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "app".to_string());

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve the dashboard page
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
