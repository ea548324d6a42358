//! Filter shapes for each read
//!
//! Pipeline shapes declare their range first so the compiled `range`
//! stage precedes every filter.

use crate::filter_shape;

filter_shape! {
    /// Unit reference data filter
    pub struct UnitFilter {
        station_name: StringFilter => column "station_name", param "station_name";
        region_id: StringFilter => column "region_id", param "region_id";
        fuel_source: StringFilter => column "fuel_source", param "fuel_source";
        technology_type: StringFilter => column "technology_type", param "technology_type";
        max_capacity: IntRangeFilter => column "max_capacity", param "max_capacity";
    }
}

impl UnitFilter {
    /// True when no field would emit a fragment
    pub fn is_unconstrained(&self) -> bool {
        self.station_name.is_unconstrained()
            && self.region_id.is_unconstrained()
            && self.fuel_source.is_unconstrained()
            && self.technology_type.is_unconstrained()
            && self.max_capacity.is_unconstrained()
    }
}

filter_shape! {
    /// Regional demand series filter
    pub struct DemandFilter {
        range: TimeRangeFilter => column "range", param "range";
        region_id: StringFilter => column "regionId", param "region_id";
        aggregate: AggregationFilter => column "aggregate", param "aggregate";
    }
}

filter_shape! {
    /// Regional rooftop solar series filter
    pub struct RooftopFilter {
        range: TimeRangeFilter => column "range", param "range";
        region_id: StringFilter => column "regionId", param "region_id";
        aggregate: AggregationFilter => column "aggregate", param "aggregate";
    }
}

filter_shape! {
    /// Per-unit generation series filter
    pub struct GenerationFilter {
        range: TimeRangeFilter => column "range", param "range";
        duid: StringFilter => column "unit", param "duid";
        aggregate: AggregationFilter => column "aggregate", param "aggregate";
    }
}

filter_shape! {
    /// Time window and aggregation shared by grouped reads
    pub struct WindowFilter {
        range: TimeRangeFilter => column "range", param "range";
        aggregate: AggregationFilter => column "aggregate", param "aggregate";
    }
}
