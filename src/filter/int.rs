//! Bounded integer filter

use super::{FromParams, QueryParams};

/// Integer filter with optional `eq`, `gt` and `lt` bounds
///
/// `None` is the "unset" state and is distinct from zero. A set `equals`
/// overrides both range bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntRangeFilter {
    pub equals: Option<i64>,
    pub greater_than: Option<i64>,
    pub less_than: Option<i64>,
}

impl IntRangeFilter {
    /// Filter on an exact value
    pub fn exactly(value: i64) -> Self {
        Self {
            equals: Some(value),
            ..Self::default()
        }
    }

    /// Filter on an open interval; either side may be unset
    pub fn between(greater_than: Option<i64>, less_than: Option<i64>) -> Self {
        Self {
            equals: None,
            greater_than,
            less_than,
        }
    }

    /// True when no bound is set
    pub fn is_unconstrained(&self) -> bool {
        self.equals.is_none() && self.greater_than.is_none() && self.less_than.is_none()
    }
}

/// Missing or unparsable values resolve to `None`, never an error
fn parse_bound(params: &QueryParams, key: &str) -> Option<i64> {
    params.first(key).and_then(|v| v.trim().parse().ok())
}

impl FromParams for IntRangeFilter {
    fn from_params(params: &QueryParams, param: &str) -> Self {
        Self {
            equals: parse_bound(params, &format!("{}.eq", param)),
            greater_than: parse_bound(params, &format!("{}.gt", param)),
            less_than: parse_bound(params, &format!("{}.lt", param)),
        }
    }
}
