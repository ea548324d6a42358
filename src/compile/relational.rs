//! Relational WHERE-clause emission

use crate::filter::{IntRangeFilter, StringFilter};
use std::fmt;

/// Quote a SQL string literal
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Escape LIKE wildcards so `contains` stays a plain substring match
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Emit a parenthesised WHERE sub-clause for one field
pub trait RelationalFragment {
    fn relational_fragment(&self, column: &str) -> Option<String>;
}

impl RelationalFragment for StringFilter {
    fn relational_fragment(&self, column: &str) -> Option<String> {
        let alternatives: Vec<String> = if !self.equals_values().is_empty() {
            self.equals_values()
                .iter()
                .map(|v| format!("{} = {}", column, sql_literal(v)))
                .collect()
        } else {
            self.contains_values()
                .iter()
                .map(|v| format!("{} LIKE {} ESCAPE '\\'", column, sql_literal(&like_pattern(v))))
                .collect()
        };

        if alternatives.is_empty() {
            return None;
        }
        Some(format!("({})", alternatives.join(" OR ")))
    }
}

impl RelationalFragment for IntRangeFilter {
    fn relational_fragment(&self, column: &str) -> Option<String> {
        if let Some(eq) = self.equals {
            return Some(format!("({} = {})", column, eq));
        }

        let bounds: Vec<String> = [
            self.greater_than.map(|gt| format!("{} > {}", column, gt)),
            self.less_than.map(|lt| format!("{} < {}", column, lt)),
        ]
        .into_iter()
        .flatten()
        .collect();

        if bounds.is_empty() {
            return None;
        }
        Some(format!("({})", bounds.join(" AND ")))
    }
}

/// A compiled WHERE clause: fragments joined with `WHERE` / `AND`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    fragments: Vec<String>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment
    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// Fragments in emission order
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// True when no field contributed a constraint
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl fmt::Display for WhereClause {
    /// Renders with a leading newline so it can be appended to a SELECT;
    /// renders nothing when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, fragment) in self.fragments.iter().enumerate() {
            let keyword = if idx == 0 { "WHERE" } else { "AND" };
            write!(f, "\n{} {}", keyword, fragment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_equals() {
        let filter = StringFilter::equals(["NSW1", "VIC1"]);
        assert_eq!(
            filter.relational_fragment("region_id").unwrap(),
            "(region_id = 'NSW1' OR region_id = 'VIC1')"
        );
    }

    #[test]
    fn test_string_contains() {
        let filter = StringFilter::contains(["Bay"]);
        assert_eq!(
            filter.relational_fragment("station_name").unwrap(),
            r"(station_name LIKE '%Bay%' ESCAPE '\')"
        );
    }

    #[test]
    fn test_equals_wins_over_contains() {
        let filter = StringFilter::equals(["Coal"]).with_contains(["Gas", "Wind"]);
        let fragment = filter.relational_fragment("fuel_source").unwrap();
        assert_eq!(fragment, "(fuel_source = 'Coal')");
        assert!(!fragment.contains("LIKE"));
    }

    #[test]
    fn test_string_unconstrained() {
        assert!(StringFilter::default().relational_fragment("x").is_none());
    }

    #[test]
    fn test_string_literal_quoting() {
        let filter = StringFilter::equals(["O'Brien"]);
        assert_eq!(
            filter.relational_fragment("station_name").unwrap(),
            "(station_name = 'O''Brien')"
        );

        let filter = StringFilter::contains(["50%"]);
        assert_eq!(
            filter.relational_fragment("station_name").unwrap(),
            r"(station_name LIKE '%50\%%' ESCAPE '\')"
        );
    }

    #[test]
    fn test_int_equals_ignores_bounds() {
        let filter = IntRangeFilter {
            equals: Some(300),
            greater_than: Some(10),
            less_than: Some(20),
        };
        assert_eq!(
            filter.relational_fragment("max_capacity").unwrap(),
            "(max_capacity = 300)"
        );
    }

    #[test]
    fn test_int_bounds() {
        let both = IntRangeFilter::between(Some(100), Some(500));
        assert_eq!(
            both.relational_fragment("max_capacity").unwrap(),
            "(max_capacity > 100 AND max_capacity < 500)"
        );

        let lower = IntRangeFilter::between(Some(0), None);
        assert_eq!(
            lower.relational_fragment("max_capacity").unwrap(),
            "(max_capacity > 0)"
        );

        assert!(IntRangeFilter::default().relational_fragment("max_capacity").is_none());
    }

    #[test]
    fn test_where_clause_rendering() {
        let mut clause = WhereClause::new();
        assert_eq!(clause.to_string(), "");

        clause.push("(a = 1)".to_string());
        clause.push("(b = 2)".to_string());
        assert_eq!(clause.to_string(), "\nWHERE (a = 1)\nAND (b = 2)");
    }
}
