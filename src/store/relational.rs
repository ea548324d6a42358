//! Relational store: generating-unit reference data
//!
//! Units live in a SQLite `units` table owned outside this crate. The
//! store only reads it.

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

use super::error::{StoreError, StoreResult};
use crate::compile::WhereClause;

const SELECT_UNITS: &str =
    "SELECT duid, station_name, region_id, fuel_source, technology_type, max_capacity FROM units";

/// A generating unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Dispatchable unit identifier
    pub duid: String,
    pub station_name: String,
    pub region_id: String,
    pub fuel_source: String,
    pub technology_type: String,
    /// Registered maximum capacity (MW)
    pub max_capacity: i64,
}

impl Unit {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            duid: text_column(row, 0)?,
            station_name: text_column(row, 1)?,
            region_id: text_column(row, 2)?,
            fuel_source: text_column(row, 3)?,
            technology_type: text_column(row, 4)?,
            max_capacity: int_column(row, 5)?,
        })
    }
}

/// NULL and non-text values decode as empty strings
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Text(s) => s,
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Null | Value::Blob(_) => String::new(),
    })
}

/// Capacities are sometimes stored as REAL; anything unusable is zero
fn int_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Integer(i) => i,
        Value::Real(r) => r as i64,
        Value::Text(s) => s.trim().parse().unwrap_or_default(),
        Value::Null | Value::Blob(_) => 0,
    })
}

/// Read access to unit reference data
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Units matching a compiled WHERE clause
    async fn read_units(&self, clause: &WhereClause) -> StoreResult<Vec<Unit>>;

    /// Distinct non-null values of a unit column, sorted
    async fn distinct_values(&self, column: &str) -> StoreResult<Vec<String>>;
}

/// SQLite-backed relational store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open an existing database read-only
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::info!("Opened unit database at {:?}", path);
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already-open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> StoreResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(f(&conn)?)
    }
}

#[async_trait]
impl RelationalStore for SqliteStore {
    async fn read_units(&self, clause: &WhereClause) -> StoreResult<Vec<Unit>> {
        let sql = format!("{}{}", SELECT_UNITS, clause);
        tracing::debug!(sql = %sql, "Reading units");

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let units = stmt
                .query_map([], Unit::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(units)
        })
    }

    async fn distinct_values(&self, column: &str) -> StoreResult<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT {col} FROM units WHERE {col} IS NOT NULL ORDER BY {col}",
            col = column
        );
        tracing::debug!(sql = %sql, "Reading distinct values");

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let values = stmt
                .query_map([], |row| text_column(row, 0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(values)
        })
    }
}
