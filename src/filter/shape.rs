//! Filter shapes
//!
//! A filter shape is a struct whose fields are filter primitives, each
//! bound to an external column (or pipeline attribute) and a query
//! parameter name. Shapes are declared with [`filter_shape!`], which
//! generates the parser and a field table in declaration order. Adding a
//! field to a shape is enough for it to take part in parsing and in both
//! compile targets.

use super::{AggregationFilter, IntRangeFilter, QueryParams, StringFilter, TimeRangeFilter};

/// Construct a filter primitive from the parameters under a name prefix
pub trait FromParams: Sized {
    fn from_params(params: &QueryParams, param: &str) -> Self;
}

/// Borrowed view of one primitive, closed over the supported kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterRef<'a> {
    Text(&'a StringFilter),
    Int(&'a IntRangeFilter),
    Range(&'a TimeRangeFilter),
    Aggregate(&'a AggregationFilter),
}

impl<'a> From<&'a StringFilter> for FilterRef<'a> {
    fn from(f: &'a StringFilter) -> Self {
        Self::Text(f)
    }
}

impl<'a> From<&'a IntRangeFilter> for FilterRef<'a> {
    fn from(f: &'a IntRangeFilter) -> Self {
        Self::Int(f)
    }
}

impl<'a> From<&'a TimeRangeFilter> for FilterRef<'a> {
    fn from(f: &'a TimeRangeFilter) -> Self {
        Self::Range(f)
    }
}

impl<'a> From<&'a AggregationFilter> for FilterRef<'a> {
    fn from(f: &'a AggregationFilter) -> Self {
        Self::Aggregate(f)
    }
}

/// One declared field of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundFilter<'a> {
    /// Rust field name
    pub name: &'static str,
    /// Column or pipeline attribute the field binds to
    pub column: &'static str,
    /// Query parameter prefix
    pub param: &'static str,
    pub filter: FilterRef<'a>,
}

/// A struct of filter primitives with a static field table
pub trait FilterShape: Sized {
    /// Parse every declared field. Never fails; see the primitives for
    /// how missing or malformed values degrade.
    fn from_params(params: &QueryParams) -> Self;

    /// Declared fields, in declaration order
    fn fields(&self) -> Vec<BoundFilter<'_>>;
}

/// Declare a filter shape.
///
/// ```rust
/// use nemdata::filter_shape;
/// use nemdata::filter::{FilterShape, QueryParams};
///
/// filter_shape! {
///     /// Example shape
///     pub struct StationFilter {
///         region_id: StringFilter => column "region_id", param "region_id";
///         max_capacity: IntRangeFilter => column "max_capacity", param "max_capacity";
///     }
/// }
///
/// let params = QueryParams::new().with("region_id", "NSW1");
/// let filter = StationFilter::from_params(&params);
/// assert_eq!(filter.fields().len(), 2);
/// ```
#[macro_export]
macro_rules! filter_shape {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $kind:ident => column $column:literal, param $param:literal;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::filter::$kind,
            )*
        }

        impl $crate::filter::FilterShape for $name {
            fn from_params(params: &$crate::filter::QueryParams) -> Self {
                Self {
                    $(
                        $field: <$crate::filter::$kind as $crate::filter::FromParams>::from_params(
                            params, $param,
                        ),
                    )*
                }
            }

            fn fields(&self) -> Vec<$crate::filter::BoundFilter<'_>> {
                vec![
                    $(
                        $crate::filter::BoundFilter {
                            name: stringify!($field),
                            column: $column,
                            param: $param,
                            filter: $crate::filter::FilterRef::from(&self.$field),
                        },
                    )*
                ]
            }
        }
    };
}
