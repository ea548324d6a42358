//! Annotated CSV decoding
//!
//! The InfluxDB query API answers with annotated CSV: `#datatype`,
//! `#group` and `#default` rows, a header row, then data rows. Every
//! table in a multi-table response carries its own annotation block.
//! The first header column is always empty.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;

use super::error::{StoreError, StoreResult};
use super::timeseries::FluxRecord;

/// Decode an annotated CSV body into records
pub fn decode(body: &str) -> StoreResult<Vec<FluxRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut header: Option<StringRecord> = None;
    let mut defaults: Option<StringRecord> = None;
    let mut in_annotations = false;

    let mut rows = reader.records();
    while let Some(row) = rows.next() {
        let row = row?;
        let first = row.get(0).unwrap_or_default();

        if first.starts_with('#') {
            if !in_annotations {
                defaults = None;
                header = None;
                in_annotations = true;
            }
            if first == "#default" {
                defaults = Some(row);
            }
            continue;
        }
        in_annotations = false;

        if header.is_none() {
            if row.iter().any(|c| c == "error") {
                return Err(error_from_table(&row, rows.next()));
            }
            header = Some(row);
            continue;
        }

        if let Some(columns) = &header {
            records.push(build_record(columns, defaults.as_ref(), &row));
        }
    }

    Ok(records)
}

fn build_record(
    header: &StringRecord,
    defaults: Option<&StringRecord>,
    row: &StringRecord,
) -> FluxRecord {
    let mut values = HashMap::with_capacity(header.len());

    for (idx, name) in header.iter().enumerate() {
        if name.is_empty() {
            continue;
        }
        let mut value = row.get(idx).unwrap_or_default();
        if value.is_empty() {
            value = defaults.and_then(|d| d.get(idx)).unwrap_or_default();
        }
        values.insert(name.to_string(), value.to_string());
    }

    let result = values.remove("result").unwrap_or_default();
    let table = values
        .remove("table")
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();

    FluxRecord {
        result,
        table,
        values,
    }
}

/// An in-band error table: header `,error,reference` followed by one row
fn error_from_table(
    header: &StringRecord,
    row: Option<csv::Result<StringRecord>>,
) -> StoreError {
    let message = row
        .and_then(Result::ok)
        .and_then(|row| {
            header
                .iter()
                .position(|c| c == "error")
                .and_then(|idx| row.get(idx).map(str::to_string))
        })
        .unwrap_or_else(|| "unknown query error".to_string());

    StoreError::TimeSeries {
        status: 200,
        message,
    }
}
