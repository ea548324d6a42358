//! Data Routes
//!
//! - GET /data/demand - Regional demand
//! - GET /data/rooftop - Regional rooftop solar
//! - GET /data/generation - Generation per unit
//! - GET /data/generation/grouped - Summed generation per group

use axum::{extract::State, Json};
use std::sync::Arc;

use super::{params, RawQuery};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::data::{
    read_demand, read_generation, read_generation_grouped, read_rooftop, GroupSeries, RegionPoint,
    UnitSeries,
};

/// GET /data/demand
pub async fn demand(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> ApiResult<Json<Vec<RegionPoint>>> {
    let points = read_demand(&params(query), state.series.as_ref(), state.bucket()).await?;
    Ok(Json(points))
}

/// GET /data/rooftop
pub async fn rooftop(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> ApiResult<Json<Vec<RegionPoint>>> {
    let points = read_rooftop(&params(query), state.series.as_ref(), state.bucket()).await?;
    Ok(Json(points))
}

/// GET /data/generation
pub async fn generation(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> ApiResult<Json<Vec<UnitSeries>>> {
    let series = read_generation(
        &params(query),
        state.units.as_ref(),
        state.series.as_ref(),
        state.bucket(),
    )
    .await?;
    Ok(Json(series))
}

/// GET /data/generation/grouped
///
/// `group` may repeat: `?group=region&group=fuel`.
pub async fn generation_grouped(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> ApiResult<Json<Vec<GroupSeries>>> {
    let series = read_generation_grouped(
        &params(query),
        state.units.as_ref(),
        state.series.as_ref(),
        state.bucket(),
    )
    .await?;
    Ok(Json(series))
}
