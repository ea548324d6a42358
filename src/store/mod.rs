//! Data stores
//!
//! The engine talks to two external stores through traits so request
//! handling never depends on a concrete backend:
//! - [`RelationalStore`]: generating-unit reference records (SQLite)
//! - [`TimeSeriesStore`]: Flux query execution (InfluxDB v2)

pub mod annotated_csv;
mod error;
mod influx;
mod relational;
mod timeseries;

pub use error::{StoreError, StoreResult};
pub use influx::InfluxClient;
pub use relational::{RelationalStore, SqliteStore, Unit};
pub use timeseries::{FluxRecord, TimeSeriesStore};

#[cfg(test)]
pub(crate) use relational::fixtures;
