//! Literal validation for time-series query fragments
//!
//! Durations follow the Flux duration grammar: one or more `<digits><unit>`
//! groups, unit one of `ns us ms s m h d w mo y`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Aggregate and selector functions accepted by `aggregateWindow`
pub const AGGREGATE_FUNCTIONS: &[&str] = &[
    "mean",
    "count",
    "integral",
    "median",
    "mode",
    "quantile",
    "reduce",
    "skew",
    "spread",
    "stddev",
    "sum",
    "timeWeightedAvg",
    "bottom",
    "distinct",
    "first",
    "highestAverage",
    "highestCurrent",
    "highestMax",
    "last",
    "limit",
    "lowestAverage",
    "lowestCurrent",
    "lowestMin",
    "max",
    "min",
    "sample",
    "top",
    "unique",
];

/// Start bound used when none (or an unusable one) is supplied
pub const DEFAULT_RANGE_START: &str = "-7d";

fn window_duration_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(ns|us|ms|s|m|h|d|w|mo|y))+$").ok())
        .as_ref()
}

fn signed_duration_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?(\d+(ns|us|ms|s|m|h|d|w|mo|y))+$").ok())
        .as_ref()
}

fn unix_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+$").ok()).as_ref()
}

/// Check an unsigned window duration such as `5m` or `1h30m`
pub fn is_window_duration(s: &str) -> bool {
    window_duration_re().is_some_and(|re| re.is_match(s))
}

/// Check a duration that may be negative, such as `-7d`
pub fn is_signed_duration(s: &str) -> bool {
    signed_duration_re().is_some_and(|re| re.is_match(s))
}

/// Check membership of the aggregate function whitelist (case-sensitive)
pub fn is_aggregate_function(s: &str) -> bool {
    AGGREGATE_FUNCTIONS.contains(&s)
}

/// One end of a time range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeBound {
    /// Duration relative to now, e.g. `-1d`
    Relative(String),
    /// Absolute instant
    Absolute(DateTime<Utc>),
    /// Unix epoch seconds
    Unix(i64),
}

impl TimeBound {
    /// Parse a raw parameter value, `None` if it matches no accepted form
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if is_signed_duration(raw) {
            return Some(Self::Relative(raw.to_string()));
        }

        if unix_re().is_some_and(|re| re.is_match(raw)) {
            return raw.parse().ok().map(Self::Unix);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Absolute(dt.with_timezone(&Utc)));
        }

        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| Self::Absolute(Utc.from_utc_datetime(&naive)))
    }

    /// The seven-days-ago default start
    pub fn default_start() -> Self {
        Self::Relative(DEFAULT_RANGE_START.to_string())
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relative(d) => write!(f, "{}", d),
            Self::Absolute(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Unix(secs) => write!(f, "{}", secs),
        }
    }
}
