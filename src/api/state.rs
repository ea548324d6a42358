//! Application State
//!
//! The request context handed to every handler. Built once at startup
//! and shared behind an `Arc`.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::store::{RelationalStore, TimeSeriesStore};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Unit reference data
    pub units: Arc<dyn RelationalStore>,
    /// Market time series
    pub series: Arc<dyn TimeSeriesStore>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: Config,
        units: Arc<dyn RelationalStore>,
        series: Arc<dyn TimeSeriesStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            units,
            series,
            start_time: Instant::now(),
        }
    }

    /// Bucket every time-series read queries
    pub fn bucket(&self) -> &str {
        &self.config.influx.bucket
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
