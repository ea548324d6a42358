//! Statement Compiler
//!
//! Walks a [`FilterShape`]'s field table and emits, per field kind:
//!
//! | kind       | relational target          | pipeline target            |
//! |------------|----------------------------|----------------------------|
//! | string     | `(col = 'a' OR ...)`       | `filter(r.col == "a" or ...)` |
//! | integer    | `(col = n)` / `(col > a AND col < b)` | -               |
//! | time range | -                          | `range(start, stop)`       |
//! | aggregate  | -                          | `aggregateWindow(...)`     |
//!
//! Fragments come out in field-declaration order. For the pipeline target
//! that order matters: shapes declare their range first so it precedes
//! every downstream filter.
//!
//! Malformed literals never fail compilation. Strings and integers with
//! nothing usable are omitted, a bad range start becomes `-7d` and an
//! invalid aggregation is dropped.

mod pipeline;
mod relational;

pub use pipeline::{Pipeline, PipelineFragment, Predicate, Stage};
pub use relational::{RelationalFragment, WhereClause};

use crate::filter::{FilterRef, FilterShape};

impl FilterRef<'_> {
    /// Relational fragment for this field, if its kind has one
    pub fn relational_fragment(&self, column: &str) -> Option<String> {
        match self {
            FilterRef::Text(f) => f.relational_fragment(column),
            FilterRef::Int(f) => f.relational_fragment(column),
            FilterRef::Range(_) | FilterRef::Aggregate(_) => None,
        }
    }

    /// Pipeline stage for this field, if its kind has one
    pub fn pipeline_stage(&self, field: &str) -> Option<Stage> {
        match self {
            FilterRef::Text(f) => f.pipeline_stage(field),
            FilterRef::Range(f) => f.pipeline_stage(field),
            FilterRef::Aggregate(f) => f.pipeline_stage(field),
            FilterRef::Int(_) => None,
        }
    }
}

/// Compile a shape to a relational WHERE clause
pub fn compile_relational<S: FilterShape>(shape: &S) -> WhereClause {
    let mut clause = WhereClause::new();
    for bound in shape.fields() {
        if let Some(fragment) = bound.filter.relational_fragment(bound.column) {
            clause.push(fragment);
        }
    }
    clause
}

/// Compile a shape to pipeline stages
pub fn compile_pipeline<S: FilterShape>(shape: &S) -> Pipeline {
    let mut pipeline = Pipeline::new();
    for bound in shape.fields() {
        if let Some(stage) = bound.filter.pipeline_stage(bound.column) {
            pipeline.push(stage);
        }
    }
    pipeline
}
