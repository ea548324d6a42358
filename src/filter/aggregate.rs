//! Aggregation-window filter

use super::literal::{is_aggregate_function, is_window_duration};
use super::{FromParams, QueryParams};

/// Window size and aggregate function for `aggregateWindow`
///
/// The filter only takes effect when both values validate. Anything else
/// is dropped without an error, which can surprise callers who mistype a
/// function name and get raw data back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationFilter {
    pub every: Option<String>,
    pub function: Option<String>,
}

impl AggregationFilter {
    /// Aggregation with the given raw window and function
    pub fn new(every: &str, function: &str) -> Self {
        Self {
            every: Some(every.to_string()),
            function: Some(function.to_string()),
        }
    }

    /// The validated `(every, fn)` pair, if both are usable
    pub fn window(&self) -> Option<(&str, &str)> {
        let every = self.every.as_deref().filter(|e| is_window_duration(e))?;
        let function = self.function.as_deref().filter(|f| is_aggregate_function(f))?;
        Some((every, function))
    }
}

impl FromParams for AggregationFilter {
    fn from_params(params: &QueryParams, param: &str) -> Self {
        Self {
            every: params.first(&format!("{}.every", param)).map(str::to_string),
            function: params.first(&format!("{}.fn", param)).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let params = QueryParams::new()
            .with("aggregate.every", "30m")
            .with("aggregate.fn", "mean");
        let filter = AggregationFilter::from_params(&params, "aggregate");
        assert_eq!(filter, AggregationFilter::new("30m", "mean"));
        assert_eq!(filter.window(), Some(("30m", "mean")));
    }

    #[test]
    fn test_window_requires_both() {
        assert!(AggregationFilter::new("30m", "average").window().is_none());
        assert!(AggregationFilter::new("-30m", "mean").window().is_none());
        assert!(AggregationFilter {
            every: Some("30m".to_string()),
            function: None,
        }
        .window()
        .is_none());
        assert!(AggregationFilter::default().window().is_none());
    }
}
