//! Read operations over unit reference data and market time series

mod error;
mod reads;
mod shapes;
mod types;

pub use error::{ReadError, ReadResult};
pub use reads::{
    flat_script, read_demand, read_generation, read_generation_grouped, read_rooftop, read_units,
    requested_groups, DEMAND_MEASUREMENT, GENERATION_MEASUREMENT, GROUP_PARAM, REGION_TAG,
    ROOFTOP_MEASUREMENT,
};
pub use shapes::{DemandFilter, GenerationFilter, RooftopFilter, UnitFilter, WindowFilter};
pub use types::{GroupSeries, RegionPoint, SeriesPoint, UnitSeries};
