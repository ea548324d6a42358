//! Unit Routes
//!
//! - GET /units - Units matching the unit filter parameters
//! - GET /units/dimensions - Distinct values of each grouping dimension

use axum::{extract::State, Json};
use std::sync::Arc;

use super::{params, RawQuery};
use crate::api::dto::DimensionsResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::data::read_units;
use crate::group::dimension_values;
use crate::store::Unit;

/// GET /units
pub async fn list_units(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> ApiResult<Json<Vec<Unit>>> {
    let units = read_units(&params(query), state.units.as_ref()).await?;
    Ok(Json(units))
}

/// GET /units/dimensions
pub async fn list_dimensions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DimensionsResponse>> {
    let dimensions = dimension_values(state.units.as_ref()).await?;
    Ok(Json(DimensionsResponse { dimensions }))
}
