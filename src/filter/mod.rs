//! Filter primitives and parameter parsing
//!
//! - **StringFilter**: exact-match or substring alternatives
//! - **IntRangeFilter**: `eq` / `gt` / `lt` bounds
//! - **TimeRangeFilter**: `start` / `stop` bounds for time-series reads
//! - **AggregationFilter**: `aggregateWindow` size and function
//!
//! Parameters use a uniform suffix convention on the field's parameter
//! name `p`:
//!
//! ```text
//! p.eq  p.li            string
//! p.eq  p.gt  p.lt      integer
//! p.start  p.stop       time range
//! p.every  p.fn         aggregation
//! ```
//!
//! Parsing is deliberately permissive. Nothing here returns an error:
//! malformed values degrade to "no constraint" and validity is enforced
//! when filters are compiled.

mod aggregate;
mod int;
pub mod literal;
mod params;
mod range;
mod shape;
mod string;

pub use aggregate::AggregationFilter;
pub use int::IntRangeFilter;
pub use literal::TimeBound;
pub use params::QueryParams;
pub use range::TimeRangeFilter;
pub use shape::{BoundFilter, FilterRef, FilterShape, FromParams};
pub use string::StringFilter;
