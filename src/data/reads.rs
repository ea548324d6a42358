//! Read operations
//!
//! Each read parses its filter shapes from the raw parameters, compiles
//! them and runs the result against the stores it is handed.

use crate::compile::{compile_pipeline, compile_relational, Stage};
use crate::filter::{FilterShape, FromParams, QueryParams, StringFilter};
use crate::group::expand;
use crate::series::{assemble, collect_series, decode_point, UNIT_TAG};
use crate::store::{RelationalStore, TimeSeriesStore, Unit};

use super::error::ReadResult;
use super::shapes::{DemandFilter, GenerationFilter, RooftopFilter, UnitFilter, WindowFilter};
use super::types::{GroupSeries, RegionPoint, UnitSeries};

pub const DEMAND_MEASUREMENT: &str = "demand";
pub const ROOFTOP_MEASUREMENT: &str = "rooftop";
pub const GENERATION_MEASUREMENT: &str = "generation";

/// Tag carrying the region in the demand and rooftop measurements
pub const REGION_TAG: &str = "regionId";

/// Parameter listing the grouping dimensions
pub const GROUP_PARAM: &str = "group";

/// Compiled shape stages followed by the measurement filter
pub fn flat_script<S: FilterShape>(shape: &S, measurement: &str, bucket: &str) -> String {
    compile_pipeline(shape)
        .then(Stage::equals("_measurement", measurement))
        .script(bucket)
}

/// Grouping dimensions requested via `group`, `group.eq`
pub fn requested_groups(params: &QueryParams) -> Vec<String> {
    StringFilter::from_params(params, GROUP_PARAM)
        .equals_values()
        .to_vec()
}

pub async fn read_units(params: &QueryParams, store: &dyn RelationalStore) -> ReadResult<Vec<Unit>> {
    let filter = UnitFilter::from_params(params);
    Ok(store.read_units(&compile_relational(&filter)).await?)
}

async fn read_region_points(
    script: &str,
    store: &dyn TimeSeriesStore,
) -> ReadResult<Vec<RegionPoint>> {
    let records = store.query(script).await?;

    Ok(records
        .iter()
        .filter_map(|record| {
            let point = decode_point(record)?;
            Some(RegionPoint {
                time: point.time,
                region_id: record.get(REGION_TAG).unwrap_or_default().to_string(),
                value: point.value,
            })
        })
        .collect())
}

pub async fn read_demand(
    params: &QueryParams,
    store: &dyn TimeSeriesStore,
    bucket: &str,
) -> ReadResult<Vec<RegionPoint>> {
    let filter = DemandFilter::from_params(params);
    read_region_points(&flat_script(&filter, DEMAND_MEASUREMENT, bucket), store).await
}

pub async fn read_rooftop(
    params: &QueryParams,
    store: &dyn TimeSeriesStore,
    bucket: &str,
) -> ReadResult<Vec<RegionPoint>> {
    let filter = RooftopFilter::from_params(params);
    read_region_points(&flat_script(&filter, ROOFTOP_MEASUREMENT, bucket), store).await
}

/// Generation series per unit.
///
/// Unit attribute parameters (`region_id`, `fuel_source`, ...) select
/// generators too: when any is given, the matching unit identifiers are
/// added to the requested `duid` values. If that leaves no identifier at
/// all, nothing can match and no query is run.
pub async fn read_generation(
    params: &QueryParams,
    relational: &dyn RelationalStore,
    timeseries: &dyn TimeSeriesStore,
    bucket: &str,
) -> ReadResult<Vec<UnitSeries>> {
    let mut filter = GenerationFilter::from_params(params);
    let units = UnitFilter::from_params(params);

    if !units.is_unconstrained() {
        let mut duids = filter.duid.equals_values().to_vec();
        for unit in relational.read_units(&compile_relational(&units)).await? {
            if !duids.contains(&unit.duid) {
                duids.push(unit.duid);
            }
        }
        if duids.is_empty() {
            tracing::debug!("No units match the unit filter");
            return Ok(Vec::new());
        }
        filter.duid.set_equals(duids);
    }

    let records = timeseries
        .query(&flat_script(&filter, GENERATION_MEASUREMENT, bucket))
        .await?;

    Ok(collect_series(&records, UNIT_TAG)
        .into_iter()
        .map(|(unit, data)| UnitSeries { unit, data })
        .collect())
}

/// Summed generation per group combination.
///
/// `group` lists the dimensions in order; the unit attribute parameters
/// restrict which units take part. Without any dimension every matching
/// unit is summed into a single series with an empty label.
pub async fn read_generation_grouped(
    params: &QueryParams,
    relational: &dyn RelationalStore,
    timeseries: &dyn TimeSeriesStore,
    bucket: &str,
) -> ReadResult<Vec<GroupSeries>> {
    let base = UnitFilter::from_params(params);
    let window = WindowFilter::from_params(params);

    let expansion = expand(&requested_groups(params), &base, relational).await?;
    tracing::debug!(
        combinations = expansion.len(),
        populated = expansion.populated().count(),
        "Group expansion complete"
    );

    Ok(assemble(&expansion, &window, GENERATION_MEASUREMENT, bucket, timeseries).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ReadError;
    use crate::store::fixtures::{store_with, unit};
    use crate::store::{FluxRecord, SqliteStore, StoreResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSeries {
        rows: Vec<FluxRecord>,
        scripts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TimeSeriesStore for FakeSeries {
        async fn query(&self, script: &str) -> StoreResult<Vec<FluxRecord>> {
            self.scripts.lock().unwrap().push(script.to_string());
            Ok(self.rows.clone())
        }
    }

    impl FakeSeries {
        fn with_rows(rows: Vec<FluxRecord>) -> Self {
            Self {
                rows,
                ..Default::default()
            }
        }

        fn last_script(&self) -> String {
            self.scripts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    fn row(pairs: &[(&str, &str)]) -> FluxRecord {
        FluxRecord {
            result: "_result".to_string(),
            table: 0,
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn units() -> SqliteStore {
        store_with(&[
            unit("BAYSW1", "NSW1", "Coal", 660),
            unit("TALWA1", "NSW1", "Gas", 440),
            unit("LYA1", "VIC1", "Coal", 560),
        ])
    }

    #[test]
    fn test_flat_script_appends_measurement() {
        let params = QueryParams::new()
            .with("region_id.eq", "NSW1")
            .with("range.start", "-1d");
        assert_eq!(
            flat_script(&DemandFilter::from_params(&params), DEMAND_MEASUREMENT, "nem"),
            "from(bucket: \"nem\")\
             \n\t|> range(start: -1d)\
             \n\t|> filter(fn: (r) => r.regionId == \"NSW1\")\
             \n\t|> filter(fn: (r) => r._measurement == \"demand\")"
        );
    }

    #[test]
    fn test_requested_groups() {
        let params = QueryParams::new().with("group", "region").with("group", "fuel");
        assert_eq!(requested_groups(&params), ["region", "fuel"]);
        assert!(requested_groups(&QueryParams::new()).is_empty());
    }

    #[tokio::test]
    async fn test_read_units() {
        let params = QueryParams::new().with("fuel_source.eq", "Coal");
        let found = read_units(&params, &units()).await.unwrap();
        let ids: Vec<_> = found.iter().map(|u| u.duid.as_str()).collect();
        assert_eq!(ids, ["BAYSW1", "LYA1"]);
    }

    #[tokio::test]
    async fn test_read_demand_decodes_points() {
        let store = FakeSeries::with_rows(vec![
            row(&[("_time", "2024-01-01T00:00:00Z"), ("_value", "7100.2"), ("regionId", "NSW1")]),
            row(&[("_time", "2024-01-01T00:05:00Z"), ("_value", "NaN?"), ("regionId", "NSW1")]),
        ]);
        let points = read_demand(&QueryParams::new(), &store, "nem").await.unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].region_id, "NSW1");
        assert_eq!(points[0].value, 7100.2);
        assert!(store.last_script().contains("range(start: -7d)"));
    }

    #[tokio::test]
    async fn test_read_rooftop_measurement() {
        let store = FakeSeries::default();
        read_rooftop(&QueryParams::new(), &store, "nem").await.unwrap();
        assert!(store
            .last_script()
            .ends_with("filter(fn: (r) => r._measurement == \"rooftop\")"));
    }

    #[tokio::test]
    async fn test_read_generation_series_by_unit() {
        let store = FakeSeries::with_rows(vec![
            row(&[("_time", "2024-01-01T00:00:00Z"), ("_value", "1"), ("unit", "LYA1")]),
            row(&[("_time", "2024-01-01T00:00:00Z"), ("_value", "2"), ("unit", "BAYSW1")]),
            row(&[("_time", "2024-01-01T00:05:00Z"), ("_value", "3"), ("unit", "LYA1")]),
        ]);
        let params = QueryParams::new().with("duid", "LYA1").with("duid", "BAYSW1");

        let series = read_generation(&params, &units(), &store, "nem").await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].unit, "LYA1");
        assert_eq!(series[0].data.len(), 2);
        assert!(store
            .last_script()
            .contains("filter(fn: (r) => r.unit == \"LYA1\" or r.unit == \"BAYSW1\")"));
    }

    #[tokio::test]
    async fn test_read_generation_merges_unit_filter() {
        let store = FakeSeries::default();
        let params = QueryParams::new()
            .with("region_id.eq", "VIC1")
            .with("duid", "TALWA1");

        read_generation(&params, &units(), &store, "nem").await.unwrap();
        assert!(store
            .last_script()
            .contains("filter(fn: (r) => r.unit == \"TALWA1\" or r.unit == \"LYA1\")"));
    }

    #[tokio::test]
    async fn test_read_generation_no_matching_units() {
        let store = FakeSeries::default();
        let params = QueryParams::new().with("region_id.eq", "TAS1");

        let series = read_generation(&params, &units(), &store, "nem").await.unwrap();
        assert!(series.is_empty());
        assert!(store.scripts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_generation_grouped() {
        let store = FakeSeries::with_rows(vec![FluxRecord {
            result: "g0".to_string(),
            ..row(&[
                ("_time", "2024-01-01T00:00:00Z"),
                ("_value", "1100"),
                ("group", "NSW1"),
            ])
        }]);
        let params = QueryParams::new().with("group", "region");

        let series = read_generation_grouped(&params, &units(), &store, "nem")
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].group, "NSW1");

        let script = store.last_script();
        assert!(script.contains("set(key: \"group\", value: \"NSW1\")"));
        assert!(script.contains("set(key: \"group\", value: \"VIC1\")"));
    }

    #[tokio::test]
    async fn test_read_generation_grouped_unknown_dimension() {
        let store = FakeSeries::default();
        let params = QueryParams::new().with("group", "owner");

        let err = read_generation_grouped(&params, &units(), &store, "nem")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(err, ReadError::Group(_)));
        assert!(store.scripts.lock().unwrap().is_empty());
    }
}
