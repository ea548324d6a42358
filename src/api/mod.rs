//! REST API
//!
//! Thin axum adapter over the read operations.
//!
//! # Endpoints
//!
//! ## Units
//! - `GET /units` - Units matching `station_name`, `region_id`,
//!   `fuel_source`, `technology_type`, `max_capacity` filters
//! - `GET /units/dimensions` - Distinct values per grouping dimension
//!
//! ## Data
//! - `GET /data/demand` - Regional demand (`range`, `region_id`, `aggregate`)
//! - `GET /data/rooftop` - Regional rooftop solar
//! - `GET /data/generation` - Per-unit generation (`duid` plus unit filters)
//! - `GET /data/generation/grouped` - Summed generation per `group` combination
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use nemdata::api::{serve, AppState};
//! use nemdata::config::Config;
//! use nemdata::store::{InfluxClient, SqliteStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default();
//!     let units = Arc::new(SqliteStore::open(&config.sqlite.path)?);
//!     let series = Arc::new(InfluxClient::new(config.influx.clone())?);
//!
//!     let api = config.api.clone();
//!     serve(AppState::new(config, units, series), &api).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// CORS for the configured origins, with credentials
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::POST,
            Method::DELETE,
            Method::PUT,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ORIGIN, header::ACCEPT])
        .allow_credentials(true)
}

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.api);

    let data_routes = Router::new()
        .route("/demand", get(routes::data::demand))
        .route("/rooftop", get(routes::data::rooftop))
        .route("/generation", get(routes::data::generation))
        .route("/generation/grouped", get(routes::data::generation_grouped));

    let unit_routes = Router::new()
        .route("/", get(routes::units::list_units))
        .route("/dimensions", get(routes::units::list_dimensions));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/units", unit_routes)
        .nest("/data", data_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("nemdata API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("nemdata API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
