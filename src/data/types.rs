//! Read results

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A regional measurement (demand, rooftop solar)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPoint {
    pub time: DateTime<Utc>,
    pub region_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// Generation series of one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSeries {
    pub unit: String,
    pub data: Vec<SeriesPoint>,
}

/// Summed generation series of one group combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSeries {
    pub group: String,
    pub data: Vec<SeriesPoint>,
}
