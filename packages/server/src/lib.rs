#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the restaurant inspection food map.
//!
//! Serves the landing and map pages from the static directory, and the
//! inspection views as JSON: each search returns the matching restaurants
//! as decoded records, their column-keyed table form, and the map center.
//! A database connection is opened per request and closed when the handler
//! returns.

pub mod config;
pub mod error;
mod handlers;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use food_map_database::db::DatabaseConfig;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// How to reach the inspection database.
    pub db: DatabaseConfig,
    /// Server and view settings.
    pub config: ServerConfig,
}

/// Registers every route. Static assets under `/static` are mounted
/// separately by [`run_server`] because they need the configured directory.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/index", web::get().to(handlers::index))
        .route("/input", web::get().to(handlers::input))
        .route("/output", web::get().to(handlers::output))
        .route("/safefoodmap", web::get().to(handlers::output))
        .route("/mapexample", web::get().to(handlers::map_example))
        .route("/momap", web::get().to(handlers::momap))
        .route("/db", web::get().to(handlers::cities))
        .route("/db_fancy", web::get().to(handlers::cities_fancy))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/violations", web::get().to(handlers::violations)),
        );
}

/// Starts the food map server.
///
/// Reads [`ServerConfig`] and [`DatabaseConfig`] from the environment and
/// starts the Actix-Web HTTP server. The caller provides the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();
    let db = DatabaseConfig::from_env();

    log::info!(
        "Serving {} from {} with {}s query timeout",
        config.inspection_table,
        db.backend,
        db.query_timeout.as_secs()
    );

    let bind = (config.bind_addr.clone(), config.port);
    let assets = config.static_dir.join("static");
    let state = web::Data::new(AppState { db, config });

    log::info!("Starting server on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .service(Files::new("/static", assets.clone()))
    })
    .bind(bind)?
    .run()
    .await
}
