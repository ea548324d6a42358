//! Time-series store: Flux query execution

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::error::StoreResult;

/// One decoded row of a Flux query result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxRecord {
    /// Name of the yield that produced the row
    pub result: String,
    /// Table index within the result
    pub table: i64,
    /// Remaining columns, by name
    pub values: HashMap<String, String>,
}

impl FluxRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// The `_time` column as a UTC timestamp
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.get("_time")
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    /// The `_value` column as a float
    pub fn value_f64(&self) -> Option<f64> {
        self.get("_value").and_then(|v| v.trim().parse().ok())
    }
}

/// Executes Flux scripts
#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// Run a script and return every row of every result table
    async fn query(&self, script: &str) -> StoreResult<Vec<FluxRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(pairs: &[(&str, &str)]) -> FluxRecord {
        FluxRecord {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_time_and_value() {
        let r = record(&[("_time", "2024-03-01T00:05:00Z"), ("_value", "412.5")]);
        assert_eq!(
            r.time(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 5, 0).unwrap())
        );
        assert_eq!(r.value_f64(), Some(412.5));
    }

    #[test]
    fn test_undecodable_columns() {
        let r = record(&[("_time", "yesterday"), ("_value", "n/a")]);
        assert_eq!(r.time(), None);
        assert_eq!(r.value_f64(), None);
        assert_eq!(r.get("unit"), None);
    }
}
