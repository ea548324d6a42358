//! # nemdata
//!
//! Electricity market data service: generating-unit reference data from
//! SQLite and demand, rooftop solar and generation series from InfluxDB,
//! selected by caller-supplied query parameters.
//!
//! ## Modules
//!
//! - [`filter`]: Filter primitives, parameter parsing, `filter_shape!`
//! - [`compile`]: SQL WHERE clause and Flux pipeline emission
//! - [`group`]: Combinatorial expansion of grouping dimensions
//! - [`series`]: Per-group query assembly and series reassembly
//! - [`store`]: SQLite and InfluxDB behind traits
//! - [`data`]: Read operations
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust
//! use nemdata::compile::compile_pipeline;
//! use nemdata::data::DemandFilter;
//! use nemdata::filter::{FilterShape, QueryParams};
//!
//! let params = QueryParams::new()
//!     .with("region_id.eq", "NSW1")
//!     .with("range.start", "-1d");
//!
//! let pipeline = compile_pipeline(&DemandFilter::from_params(&params));
//! assert_eq!(
//!     pipeline.script("nema_bucket"),
//!     "from(bucket: \"nema_bucket\")\n\t|> range(start: -1d)\n\t|> filter(fn: (r) => r.regionId == \"NSW1\")"
//! );
//! ```
//!
//! ## Surprising defaults
//!
//! Requests are never rejected for malformed filter values:
//! - a string filter with both `.eq` and `.li` uses only `.eq`
//! - an unparsable integer bound is no bound
//! - an unusable `range.start` becomes `-7d`, an unusable `range.stop` is dropped
//! - an aggregation whose window or function is invalid is dropped entirely

pub mod filter;

pub mod api;
pub mod compile;
pub mod config;
pub mod data;
pub mod group;
pub mod logging;
pub mod series;
pub mod store;

pub use api::{build_router, serve, ApiError, AppState};
pub use config::{Config, ConfigError};
pub use data::{ReadError, ReadResult};
pub use store::{InfluxClient, RelationalStore, SqliteStore, StoreError, TimeSeriesStore};
