//! API Routes
//!
//! Route handlers organized by resource.

pub mod data;
pub mod health;
pub mod units;

use axum::extract::Query;

use crate::filter::QueryParams;

/// Raw query string pairs, repeated keys kept in order
pub type RawQuery = Query<Vec<(String, String)>>;

pub(crate) fn params(Query(pairs): RawQuery) -> QueryParams {
    QueryParams::from_pairs(pairs)
}
