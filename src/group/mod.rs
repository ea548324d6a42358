//! Group Expander
//!
//! Turns an ordered list of grouping dimensions (`region`, `fuel`,
//! `technology`) plus a base unit filter into the cross-product of
//! narrowed filters and their member units, keyed by composite labels
//! such as `NSW1+Coal`.

mod combination;
mod dimension;
mod error;
mod expander;

pub use combination::{GroupCombination, NarrowedFilter, LABEL_SEPARATOR};
pub use dimension::GroupDimension;
pub use error::{GroupError, GroupResult};
pub use expander::{dimension_values, expand, resolve_dimensions, GroupExpansion};
