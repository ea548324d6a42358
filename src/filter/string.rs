//! String filter: exact-match or substring alternatives

use super::{FromParams, QueryParams};

/// Equality / substring filter over a string column
///
/// Both lists hold OR'd alternatives. When `equals` is non-empty it wins
/// outright and `contains` is ignored; the two never combine into a
/// conjunction. Callers that send both should be aware this is silent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringFilter {
    equals: Vec<String>,
    contains: Vec<String>,
}

impl StringFilter {
    /// Filter matching any of the given values exactly
    pub fn equals<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            equals: values.into_iter().map(Into::into).collect(),
            contains: Vec::new(),
        }
    }

    /// Filter matching any value containing one of the given substrings
    pub fn contains<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            equals: Vec::new(),
            contains: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Builder method: set substring alternatives
    pub fn with_contains<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains = values.into_iter().map(Into::into).collect();
        self
    }

    /// Exact-match alternatives
    pub fn equals_values(&self) -> &[String] {
        &self.equals
    }

    /// Substring alternatives
    pub fn contains_values(&self) -> &[String] {
        &self.contains
    }

    /// Replace the exact-match alternatives
    pub fn set_equals(&mut self, values: Vec<String>) {
        self.equals = values;
    }

    /// True when neither list carries a value
    pub fn is_unconstrained(&self) -> bool {
        self.equals.is_empty() && self.contains.is_empty()
    }
}

impl FromParams for StringFilter {
    fn from_params(params: &QueryParams, param: &str) -> Self {
        let mut filter = Self {
            equals: params.get(&format!("{}.eq", param)).map(<[String]>::to_vec).unwrap_or_default(),
            contains: params.get(&format!("{}.li", param)).map(<[String]>::to_vec).unwrap_or_default(),
        };

        // Bare `param=value` is shorthand for `param.eq=value`
        if filter.is_unconstrained() {
            if let Some(values) = params.get(param) {
                filter.equals = values.to_vec();
            }
        }

        filter
    }
}
