//! Combinatorial group expansion

use std::collections::{BTreeMap, HashSet};

use super::combination::GroupCombination;
use super::dimension::GroupDimension;
use super::error::{GroupError, GroupResult};
use crate::compile::compile_relational;
use crate::data::UnitFilter;
use crate::store::RelationalStore;

/// Every combination of an expansion, in cross-product order
///
/// Combinations with no member units are kept so the label set is the
/// full cross-product. Consumers that only want series for real groups
/// go through [`GroupExpansion::populated`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupExpansion {
    combinations: Vec<GroupCombination>,
}

impl GroupExpansion {
    pub fn from_combinations(combinations: Vec<GroupCombination>) -> Self {
        Self { combinations }
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&GroupCombination> {
        self.combinations.iter().find(|c| c.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupCombination> {
        self.combinations.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.combinations.iter().map(|c| c.label.as_str())
    }

    /// Combinations with at least one member unit
    pub fn populated(&self) -> impl Iterator<Item = &GroupCombination> {
        self.combinations.iter().filter(|c| !c.is_empty())
    }
}

impl IntoIterator for GroupExpansion {
    type Item = GroupCombination;
    type IntoIter = std::vec::IntoIter<GroupCombination>;

    fn into_iter(self) -> Self::IntoIter {
        self.combinations.into_iter()
    }
}

/// Parse requested dimension names, dropping repeats (first wins)
pub fn resolve_dimensions(requested: &[String]) -> GroupResult<Vec<GroupDimension>> {
    let mut dimensions = Vec::with_capacity(requested.len());
    for name in requested {
        let dimension: GroupDimension = name.parse()?;
        if !dimensions.contains(&dimension) {
            dimensions.push(dimension);
        }
    }
    Ok(dimensions)
}

/// Replace each combination with one narrowed copy per value
fn cross(
    combinations: Vec<GroupCombination>,
    dimension: GroupDimension,
    values: &[String],
) -> Vec<GroupCombination> {
    combinations
        .iter()
        .flat_map(|combination| {
            values
                .iter()
                .map(move |value| combination.narrow(dimension, value))
        })
        .collect()
}

/// Expand requested grouping dimensions into labelled unit subsets.
///
/// The result has one combination per element of the cross-product of
/// each dimension's distinct values, so its size is the product of those
/// counts and has no upper bound beyond the data. An unknown dimension
/// fails before any store access, and values that make two combinations
/// share a label fail the whole expansion. With no dimensions the result
/// is the single empty-label combination holding every unit matching
/// `base`.
pub async fn expand(
    requested: &[String],
    base: &UnitFilter,
    store: &dyn RelationalStore,
) -> GroupResult<GroupExpansion> {
    let dimensions = resolve_dimensions(requested)?;

    let units = store.read_units(&compile_relational(base)).await?;
    let mut combinations = vec![GroupCombination::root(base.clone(), units)];

    for dimension in dimensions {
        let values = store.distinct_values(dimension.column()).await?;
        combinations = cross(combinations, dimension, &values);
        tracing::debug!(
            dimension = %dimension,
            values = values.len(),
            combinations = combinations.len(),
            "Expanded grouping dimension"
        );
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = combinations
        .iter()
        .find(|c| !seen.insert(c.label.as_str()))
    {
        return Err(GroupError::DuplicateLabel(duplicate.label.clone()));
    }

    Ok(GroupExpansion::from_combinations(combinations))
}

/// Distinct values of every supported dimension
pub async fn dimension_values(
    store: &dyn RelationalStore,
) -> GroupResult<BTreeMap<GroupDimension, Vec<String>>> {
    let mut lookup = BTreeMap::new();
    for dimension in GroupDimension::all() {
        lookup.insert(dimension, store.distinct_values(dimension.column()).await?);
    }
    Ok(lookup)
}
