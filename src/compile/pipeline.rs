//! Pipeline (Flux) stage emission
//!
//! Stages are typed so callers and tests can inspect what was compiled;
//! `Display` renders each one as a `|>` step of a Flux script.

use crate::filter::{AggregationFilter, StringFilter, TimeBound, TimeRangeFilter};
use std::fmt;

/// Quote a Flux string literal, with `${` escaped so values never interpolate
fn flux_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "\\${");
    format!("\"{}\"", escaped)
}

/// Substring regex literal; the value is matched literally
fn flux_regex(value: &str) -> String {
    format!("/{}/", regex::escape(value).replace('/', "\\/"))
}

/// One OR'd alternative inside a filter stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `r.field == "value"`
    Equals(String),
    /// `r.field =~ /value/`
    Matches(String),
}

/// One step of a pipeline query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Range {
        start: TimeBound,
        stop: Option<TimeBound>,
    },
    /// Keep records whose `field` satisfies any predicate
    Filter {
        field: String,
        predicates: Vec<Predicate>,
    },
    AggregateWindow {
        every: String,
        function: String,
    },
    Group {
        columns: Vec<String>,
    },
    /// Bare aggregate call such as `sum()`
    Reduce(String),
    Sort {
        columns: Vec<String>,
    },
    /// Add a constant column to every record
    Set {
        key: String,
        value: String,
    },
    Yield {
        name: String,
    },
}

impl Stage {
    /// Equality filter on a single value
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Filter {
            field: field.into(),
            predicates: vec![Predicate::Equals(value.into())],
        }
    }

    /// Equality filter matching any of `values`
    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Filter {
            field: field.into(),
            predicates: values.into_iter().map(|v| Predicate::Equals(v.into())).collect(),
        }
    }
}

fn quoted_columns(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| flux_string(c))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { start, stop: None } => write!(f, "\t|> range(start: {})", start),
            Self::Range {
                start,
                stop: Some(stop),
            } => write!(f, "\t|> range(start: {}, stop: {})", start, stop),
            Self::Filter { field, predicates } => {
                let alternatives: Vec<String> = predicates
                    .iter()
                    .map(|p| match p {
                        Predicate::Equals(v) => format!("r.{} == {}", field, flux_string(v)),
                        Predicate::Matches(v) => format!("r.{} =~ {}", field, flux_regex(v)),
                    })
                    .collect();
                write!(f, "\t|> filter(fn: (r) => {})", alternatives.join(" or "))
            }
            Self::AggregateWindow { every, function } => write!(
                f,
                "\t|> aggregateWindow(every: {}, fn: {}, createEmpty: false)",
                every, function
            ),
            Self::Group { columns } if columns.is_empty() => write!(f, "\t|> group()"),
            Self::Group { columns } => {
                write!(f, "\t|> group(columns: [{}])", quoted_columns(columns))
            }
            Self::Reduce(function) => write!(f, "\t|> {}()", function),
            Self::Sort { columns } => {
                write!(f, "\t|> sort(columns: [{}])", quoted_columns(columns))
            }
            Self::Set { key, value } => write!(
                f,
                "\t|> set(key: {}, value: {})",
                flux_string(key),
                flux_string(value)
            ),
            Self::Yield { name } => write!(f, "\t|> yield(name: {})", flux_string(name)),
        }
    }
}

/// Emit the pipeline stage for one field
pub trait PipelineFragment {
    fn pipeline_stage(&self, field: &str) -> Option<Stage>;
}

impl PipelineFragment for StringFilter {
    fn pipeline_stage(&self, field: &str) -> Option<Stage> {
        let predicates: Vec<Predicate> = if !self.equals_values().is_empty() {
            self.equals_values().iter().cloned().map(Predicate::Equals).collect()
        } else {
            self.contains_values().iter().cloned().map(Predicate::Matches).collect()
        };

        if predicates.is_empty() {
            return None;
        }
        Some(Stage::Filter {
            field: field.to_string(),
            predicates,
        })
    }
}

impl PipelineFragment for TimeRangeFilter {
    /// Always emits a range; unusable bounds fall back to the default
    fn pipeline_stage(&self, _field: &str) -> Option<Stage> {
        let (start, stop) = self.bounds();
        Some(Stage::Range { start, stop })
    }
}

impl PipelineFragment for AggregationFilter {
    fn pipeline_stage(&self, _field: &str) -> Option<Stage> {
        self.window().map(|(every, function)| Stage::AggregateWindow {
            every: every.to_string(),
            function: function.to_string(),
        })
    }
}

/// An ordered list of stages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage
    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Builder method: append a stage
    pub fn then(mut self, stage: Stage) -> Self {
        self.push(stage);
        self
    }

    /// Stages in order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render a complete script reading from `bucket`
    pub fn script(&self, bucket: &str) -> String {
        format!("from(bucket: {}){}", flux_string(bucket), self)
    }
}

impl fmt::Display for Pipeline {
    /// Stages only, each on its own line with a leading newline
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stage in &self.stages {
            write!(f, "\n{}", stage)?;
        }
        Ok(())
    }
}

impl IntoIterator for Pipeline {
    type Item = Stage;
    type IntoIter = std::vec::IntoIter<Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.into_iter()
    }
}
