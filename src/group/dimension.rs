//! Grouping dimensions

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::GroupError;
use crate::store::Unit;

/// A unit attribute series can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupDimension {
    Region,
    Fuel,
    Technology,
}

impl GroupDimension {
    pub fn all() -> [GroupDimension; 3] {
        [
            GroupDimension::Region,
            GroupDimension::Fuel,
            GroupDimension::Technology,
        ]
    }

    /// Request name
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupDimension::Region => "region",
            GroupDimension::Fuel => "fuel",
            GroupDimension::Technology => "technology",
        }
    }

    /// Column in the `units` table
    pub fn column(&self) -> &'static str {
        match self {
            GroupDimension::Region => "region_id",
            GroupDimension::Fuel => "fuel_source",
            GroupDimension::Technology => "technology_type",
        }
    }

    pub fn value_of<'u>(&self, unit: &'u Unit) -> &'u str {
        match self {
            GroupDimension::Region => &unit.region_id,
            GroupDimension::Fuel => &unit.fuel_source,
            GroupDimension::Technology => &unit.technology_type,
        }
    }
}

impl FromStr for GroupDimension {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(GroupDimension::Region),
            "fuel" => Ok(GroupDimension::Fuel),
            "technology" => Ok(GroupDimension::Technology),
            other => Err(GroupError::UnknownDimension(other.to_string())),
        }
    }
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for dim in GroupDimension::all() {
            assert_eq!(dim.as_str().parse::<GroupDimension>().unwrap(), dim);
        }
    }

    #[test]
    fn test_unknown_dimension() {
        let err = "station".parse::<GroupDimension>().unwrap_err();
        assert!(matches!(err, GroupError::UnknownDimension(ref d) if d == "station"));
        assert!("Region".parse::<GroupDimension>().is_err());
    }

    #[test]
    fn test_value_of() {
        let unit = Unit {
            region_id: "QLD1".to_string(),
            fuel_source: "Solar".to_string(),
            technology_type: "Photovoltaic".to_string(),
            ..Default::default()
        };
        assert_eq!(GroupDimension::Region.value_of(&unit), "QLD1");
        assert_eq!(GroupDimension::Fuel.value_of(&unit), "Solar");
        assert_eq!(GroupDimension::Technology.column(), "technology_type");
    }
}
