//! Filter Engine - ad-hoc predicate clauses over rows
//!
//! Key invariants:
//! - Clauses combine with AND; there is no OR and no nesting
//! - Inert clauses (blank comparison text) are removed before evaluation
//! - Filtering never reorders: output is a subsequence of the input
//! - Text operators compare lower-cased text on both sides
//! - Numeric operators fail closed when either side is not a number
//! - Unknown operators fail open (the clause passes)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::row::{Field, Row};
use crate::value::{parse_number, NumberParse};

// =============================================================================
// FilterOperator
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    /// Any operator name this build does not know. Always passes.
    #[serde(other)]
    Unknown,
}

impl FilterOperator {
    pub const KNOWN: [FilterOperator; 6] = [
        FilterOperator::Equals,
        FilterOperator::Contains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::Unknown => "unknown",
        }
    }

    /// Parse an operator name; unrecognised names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        FilterOperator::KNOWN
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(FilterOperator::Unknown)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FilterOperator::GreaterThan | FilterOperator::LessThan)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// FilterClause
// =============================================================================

/// One `(field, operator, comparison text)` predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterClause {
    #[serde(rename = "column")]
    pub field: Field,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterClause {
    pub fn new(field: Field, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self { field, operator, value: value.into() }
    }

    /// A clause with blank comparison text filters nothing and is dropped.
    pub fn is_inert(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.text(self.field).to_lowercase();
        let needle = self.value.to_lowercase();

        match self.operator {
            FilterOperator::Equals => cell == needle,
            FilterOperator::Contains => cell.contains(&needle),
            FilterOperator::StartsWith => cell.starts_with(&needle),
            FilterOperator::EndsWith => cell.ends_with(&needle),
            FilterOperator::GreaterThan => compare_numbers(&cell, &needle, |a, b| a > b),
            FilterOperator::LessThan => compare_numbers(&cell, &needle, |a, b| a < b),
            FilterOperator::Unknown => true,
        }
    }
}

// RULE: an unparseable side makes the comparison false
fn compare_numbers(cell: &str, needle: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (parse_number(cell), parse_number(needle)) {
        (NumberParse::Parsed(a), NumberParse::Parsed(b)) => cmp(a, b),
        _ => false,
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Drop inert clauses.
pub fn active_clauses(clauses: &[FilterClause]) -> Vec<FilterClause> {
    clauses.iter().filter(|c| !c.is_inert()).cloned().collect()
}

/// Does `row` satisfy every clause?
pub fn row_passes(row: &Row, clauses: &[FilterClause]) -> bool {
    clauses.iter().all(|c| c.matches(row))
}

/// Keep the rows that satisfy every clause, in input order.
///
/// Callers pass clauses with inert ones already removed (see [`active_clauses`]).
/// An empty clause list keeps everything.
pub fn apply_filters<'a, I>(rows: I, clauses: &[FilterClause]) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    rows.into_iter().filter(|row| row_passes(row, clauses)).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Status;
    use chrono::NaiveDate;

    fn row(id: u64, label: &str, status: Status, value: f64) -> Row {
        let mut r = Row::blank(id, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        r.job_request = label.to_string();
        r.status = status;
        r.est_value = value;
        r
    }

    fn scenario_rows() -> Vec<Row> {
        vec![
            row(1, "Fix bug", Status::Complete, 500.0),
            row(2, "Write docs", Status::InProgress, 200.0),
        ]
    }

    fn ids(rows: &[&Row]) -> Vec<u64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_status_equals_scenario() {
        let rows = scenario_rows();
        let clauses = vec![FilterClause::new(Field::Status, FilterOperator::Equals, "Complete")];
        assert_eq!(ids(&apply_filters(&rows, &clauses)), vec![1]);
    }

    #[test]
    fn test_text_operators_case_insensitive() {
        let rows = scenario_rows();
        let check = |op, value: &str| ids(&apply_filters(&rows, &[FilterClause::new(Field::JobRequest, op, value)]));

        assert_eq!(check(FilterOperator::Contains, "DOC"), vec![2]);
        assert_eq!(check(FilterOperator::StartsWith, "fix"), vec![1]);
        assert_eq!(check(FilterOperator::EndsWith, "Bug"), vec![1]);
        assert_eq!(check(FilterOperator::Equals, "write docs"), vec![2]);
        assert_eq!(check(FilterOperator::Equals, "write"), Vec::<u64>::new());
    }

    #[test]
    fn test_numeric_operators() {
        let rows = scenario_rows();
        let gt = [FilterClause::new(Field::EstValue, FilterOperator::GreaterThan, "300")];
        let lt = [FilterClause::new(Field::EstValue, FilterOperator::LessThan, "300")];
        assert_eq!(ids(&apply_filters(&rows, &gt)), vec![1]);
        assert_eq!(ids(&apply_filters(&rows, &lt)), vec![2]);
    }

    #[test]
    fn test_numeric_operator_non_numeric_value_fails_closed() {
        let rows = scenario_rows();
        let gt = [FilterClause::new(Field::EstValue, FilterOperator::GreaterThan, "lots")];
        let lt = [FilterClause::new(Field::EstValue, FilterOperator::LessThan, "lots")];
        assert!(apply_filters(&rows, &gt).is_empty());
        assert!(apply_filters(&rows, &lt).is_empty());

        // Non-numeric cell also fails
        let label_gt = [FilterClause::new(Field::JobRequest, FilterOperator::GreaterThan, "0")];
        assert!(apply_filters(&rows, &label_gt).is_empty());
    }

    #[test]
    fn test_unknown_operator_fails_open() {
        let rows = scenario_rows();
        let clauses = [FilterClause::new(Field::JobRequest, FilterOperator::Unknown, "zzz")];
        assert_eq!(apply_filters(&rows, &clauses).len(), 2);
    }

    #[test]
    fn test_unknown_operator_from_payload() {
        let json = r#"{"column":"status","operator":"regex","value":"x"}"#;
        let clause: FilterClause = serde_json::from_str(json).unwrap();
        assert_eq!(clause.operator, FilterOperator::Unknown);
        assert_eq!(FilterOperator::from_name("STARTSWITH"), FilterOperator::StartsWith);
        assert_eq!(FilterOperator::from_name("between"), FilterOperator::Unknown);
    }

    #[test]
    fn test_clauses_combine_with_and() {
        let rows = scenario_rows();
        let clauses = vec![
            FilterClause::new(Field::JobRequest, FilterOperator::Contains, "i"),
            FilterClause::new(Field::EstValue, FilterOperator::LessThan, "300"),
        ];
        assert_eq!(ids(&apply_filters(&rows, &clauses)), vec![2]);
    }

    #[test]
    fn test_inert_clauses_removed() {
        let clauses = vec![
            FilterClause::new(Field::JobRequest, FilterOperator::Contains, "   "),
            FilterClause::new(Field::Status, FilterOperator::Equals, "Complete"),
        ];
        let active = active_clauses(&clauses);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].field, Field::Status);
    }

    #[test]
    fn test_no_clauses_keeps_all() {
        let rows = scenario_rows();
        assert_eq!(apply_filters(&rows, &[]).len(), 2);
    }
}
