//! Per-group query construction and result reassembly

use std::collections::HashMap;

use crate::compile::{compile_pipeline, Pipeline, Stage};
use crate::data::{GroupSeries, SeriesPoint, WindowFilter};
use crate::group::{GroupCombination, GroupExpansion};
use crate::store::{FluxRecord, StoreResult, TimeSeriesStore};

use super::accumulator::SeriesAccumulator;

/// Column each group's records are tagged with
pub const GROUP_COLUMN: &str = "group";

/// Tag carrying the unit identifier in the generation measurement
pub const UNIT_TAG: &str = "unit";

/// Result name of the `index`-th populated combination
pub fn yield_name(index: usize) -> String {
    format!("g{}", index)
}

/// Summed series for one combination.
///
/// Measurement and membership filters go directly after the range so
/// the window aggregation only sees member units.
pub fn group_pipeline(
    window: &WindowFilter,
    measurement: &str,
    combination: &GroupCombination,
    index: usize,
) -> Pipeline {
    let mut pipeline = Pipeline::new();
    for stage in compile_pipeline(window) {
        let is_range = matches!(stage, Stage::Range { .. });
        pipeline.push(stage);
        if is_range {
            pipeline.push(Stage::equals("_measurement", measurement));
            pipeline.push(Stage::any_of(UNIT_TAG, combination.unit_ids()));
        }
    }

    pipeline
        .then(Stage::Group {
            columns: vec!["_time".to_string()],
        })
        .then(Stage::Reduce("sum".to_string()))
        .then(Stage::Group { columns: vec![] })
        .then(Stage::Sort {
            columns: vec!["_time".to_string()],
        })
        .then(Stage::Set {
            key: GROUP_COLUMN.to_string(),
            value: combination.label.clone(),
        })
        .then(Stage::Yield {
            name: yield_name(index),
        })
}

/// One script yielding every populated combination, `None` if there are none
pub fn group_script(
    expansion: &GroupExpansion,
    window: &WindowFilter,
    measurement: &str,
    bucket: &str,
) -> Option<String> {
    let scripts: Vec<String> = expansion
        .populated()
        .enumerate()
        .map(|(idx, combination)| {
            group_pipeline(window, measurement, combination, idx).script(bucket)
        })
        .collect();

    if scripts.is_empty() {
        None
    } else {
        Some(scripts.join("\n\n"))
    }
}

/// Time/value of a record, `None` (logged) when either does not decode
pub(crate) fn decode_point(record: &FluxRecord) -> Option<SeriesPoint> {
    match (record.time(), record.value_f64()) {
        (Some(time), Some(value)) => Some(SeriesPoint { time, value }),
        _ => {
            tracing::warn!(
                result = %record.result,
                time = ?record.get("_time"),
                value = ?record.get("_value"),
                "Skipping undecodable point"
            );
            None
        }
    }
}

/// Fold records into series keyed by `column`, in first-seen order
pub(crate) fn collect_series(records: &[FluxRecord], column: &str) -> Vec<(String, Vec<SeriesPoint>)> {
    let mut acc = SeriesAccumulator::new();
    for record in records {
        let Some(key) = record.get(column) else {
            tracing::debug!(column, "Record without series key");
            continue;
        };
        if let Some(point) = decode_point(record) {
            acc.push(key, point);
        }
    }
    acc.into_series()
}

/// Run the per-group queries as one execution and reassemble the series.
///
/// Records are routed by their result (yield) name, so each combination
/// keeps its own series whatever text its label holds. Empty combinations
/// are never queried. Any store failure fails the whole assembly.
pub async fn assemble(
    expansion: &GroupExpansion,
    window: &WindowFilter,
    measurement: &str,
    bucket: &str,
    store: &dyn TimeSeriesStore,
) -> StoreResult<Vec<GroupSeries>> {
    let Some(script) = group_script(expansion, window, measurement, bucket) else {
        tracing::debug!("No populated groups, skipping query");
        return Ok(Vec::new());
    };

    let labels: HashMap<String, &str> = expansion
        .populated()
        .enumerate()
        .map(|(idx, combination)| (yield_name(idx), combination.label.as_str()))
        .collect();

    let records = store.query(&script).await?;

    let mut acc = SeriesAccumulator::new();
    for record in &records {
        if !labels.contains_key(&record.result) {
            tracing::debug!(result = %record.result, "Record from unknown result");
            continue;
        }
        if let Some(point) = decode_point(record) {
            acc.push(&record.result, point);
        }
    }

    Ok(acc
        .into_series()
        .into_iter()
        .filter_map(|(name, data)| {
            labels.get(&name).map(|label| GroupSeries {
                group: label.to_string(),
                data,
            })
        })
        .collect())
}
