//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// The unit database is probed with a distinct-region read. The
/// time-series store is not probed; a failing InfluxDB shows up on the
/// data routes.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let units_ok = match state.units.distinct_values("region_id").await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Unit database health check failed: {}", e);
            false
        }
    };

    Json(HealthResponse {
        status: if units_ok { "healthy" } else { "degraded" }.to_string(),
        units: if units_ok { "ok" } else { "error" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
