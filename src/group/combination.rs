//! Group combinations

use crate::compile::{compile_relational, RelationalFragment, WhereClause};
use crate::data::UnitFilter;
use crate::filter::StringFilter;
use crate::store::Unit;

use super::dimension::GroupDimension;

/// Separator between dimension values in a composite label
pub const LABEL_SEPARATOR: &str = "+";

/// A base unit filter narrowed by one equality pin per processed dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrowedFilter {
    pub base: UnitFilter,
    pub pins: Vec<(GroupDimension, String)>,
}

impl NarrowedFilter {
    pub fn new(base: UnitFilter) -> Self {
        Self {
            base,
            pins: Vec::new(),
        }
    }

    pub fn narrow(&self, dimension: GroupDimension, value: &str) -> Self {
        let mut pins = self.pins.clone();
        pins.push((dimension, value.to_string()));
        Self {
            base: self.base.clone(),
            pins,
        }
    }

    /// Base fragments followed by the pins, all ANDed
    pub fn where_clause(&self) -> WhereClause {
        let mut clause = compile_relational(&self.base);
        for (dimension, value) in &self.pins {
            if let Some(fragment) =
                StringFilter::equals([value.as_str()]).relational_fragment(dimension.column())
            {
                clause.push(fragment);
            }
        }
        clause
    }

    /// Check a unit against the pins only; the base is applied by the store
    pub fn matches(&self, unit: &Unit) -> bool {
        self.pins
            .iter()
            .all(|(dimension, value)| dimension.value_of(unit) == value)
    }
}

/// One leaf of the group cross-product
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCombination {
    /// Dimension values joined by `+`, e.g. `NSW1+Coal`
    pub label: String,
    pub filter: NarrowedFilter,
    pub units: Vec<Unit>,
}

impl GroupCombination {
    /// The empty-label combination every expansion starts from
    pub fn root(base: UnitFilter, units: Vec<Unit>) -> Self {
        Self {
            label: String::new(),
            filter: NarrowedFilter::new(base),
            units,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit identifiers, in unit order
    pub fn unit_ids(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.duid.as_str())
    }

    /// Narrow by `dimension == value`
    pub fn narrow(&self, dimension: GroupDimension, value: &str) -> Self {
        let label = if self.label.is_empty() {
            value.to_string()
        } else {
            format!("{}{}{}", self.label, LABEL_SEPARATOR, value)
        };

        let filter = self.filter.narrow(dimension, value);
        let units = self
            .units
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();

        Self {
            label,
            filter,
            units,
        }
    }
}
