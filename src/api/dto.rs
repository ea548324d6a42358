//! Response types that are not read results

use serde::Serialize;
use std::collections::BTreeMap;

use crate::group::GroupDimension;

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Unit database status
    pub units: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

/// Distinct values of every grouping dimension
#[derive(Debug, Serialize)]
pub struct DimensionsResponse {
    pub dimensions: BTreeMap<GroupDimension, Vec<String>>,
}
