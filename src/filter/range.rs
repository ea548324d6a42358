//! Time-range filter

use super::literal::TimeBound;
use super::{FromParams, QueryParams};

/// Raw `start` / `stop` bounds, validated only when compiled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRangeFilter {
    pub start: Option<String>,
    pub stop: Option<String>,
}

impl TimeRangeFilter {
    /// Range with the given raw bounds
    pub fn new(start: Option<&str>, stop: Option<&str>) -> Self {
        Self {
            start: start.map(str::to_string),
            stop: stop.map(str::to_string),
        }
    }

    /// Resolve the effective bounds.
    ///
    /// An absent or invalid start falls back to seven days ago and drops
    /// the stop entirely. An absent or invalid stop leaves the range open.
    pub fn bounds(&self) -> (TimeBound, Option<TimeBound>) {
        match self.start.as_deref().and_then(TimeBound::parse) {
            Some(start) => (start, self.stop.as_deref().and_then(TimeBound::parse)),
            None => (TimeBound::default_start(), None),
        }
    }
}

impl FromParams for TimeRangeFilter {
    fn from_params(params: &QueryParams, param: &str) -> Self {
        Self {
            start: params.first(&format!("{}.start", param)).map(str::to_string),
            stop: params.first(&format!("{}.stop", param)).map(str::to_string),
        }
    }
}
