//! Sort Engine - single-key, type-aware, stable ordering of rows
//!
//! Comparison by field:
//! - `estValue`: numeric
//! - `submitted`, `dueDate`: calendar dates; unparseable dates form one bucket
//!   that sorts after every valid date in ascending order (before them in
//!   descending) and compares equal within itself
//! - everything else: case-insensitive text
//!
//! Descending reverses the base comparison. The sort is stable in both
//! directions, so equal keys keep their input order and re-sorting is idempotent.

use std::cmp::Ordering;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::row::{Field, Row, RowId};
use crate::value::parse_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// The one active ordering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDirective {
    #[serde(rename = "key")]
    pub field: Field,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn ascending(field: Field) -> Self {
        Self { field, direction: SortDirection::Ascending }
    }

    pub fn descending(field: Field) -> Self {
        Self { field, direction: SortDirection::Descending }
    }

    /// Header-click cycle: none -> asc -> desc -> none on the same field;
    /// a different field starts at asc. Non-sortable columns change nothing.
    pub fn cycle(current: Option<SortDirective>, field: Field, sortable: bool) -> Option<SortDirective> {
        if !sortable {
            return current;
        }
        match current {
            Some(d) if d.field == field => match d.direction {
                SortDirection::Ascending => Some(SortDirective::descending(field)),
                SortDirection::Descending => None,
            },
            _ => Some(SortDirective::ascending(field)),
        }
    }
}

// =============================================================================
// SortKey: typed key extracted once per row
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum SortKey {
    Id(RowId),
    Number(OrderedFloat<f64>),
    /// `None` = unparseable
    Date(Option<NaiveDate>),
    Text(String),
}

impl SortKey {
    fn for_row(row: &Row, field: Field) -> Self {
        match field {
            Field::Id => SortKey::Id(row.id),
            Field::EstValue => SortKey::Number(OrderedFloat(row.est_value)),
            Field::Submitted | Field::DueDate => SortKey::Date(parse_date(&row.text(field)).value()),
            Field::JobRequest
            | Field::Status
            | Field::Submitter
            | Field::Url
            | Field::Assigned
            | Field::Priority => SortKey::Text(row.text(field).to_lowercase()),
        }
    }

    /// Base (ascending) comparison. All keys in one sort share a variant.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Id(a), SortKey::Id(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Base comparison of two rows on `field`.
pub fn compare_rows(a: &Row, b: &Row, field: Field) -> Ordering {
    SortKey::for_row(a, field).compare(&SortKey::for_row(b, field))
}

/// Return `rows` ordered by `directive`; `None` keeps the input order.
pub fn apply_sort<'a>(rows: Vec<&'a Row>, directive: Option<&SortDirective>) -> Vec<&'a Row> {
    let Some(directive) = directive else {
        return rows;
    };

    let mut keyed: Vec<(SortKey, &'a Row)> = rows
        .into_iter()
        .map(|row| (SortKey::for_row(row, directive.field), row))
        .collect();

    // sort_by is stable; flipping the comparison (not reversing the output)
    // keeps ties in input order for descending too
    match directive.direction {
        SortDirection::Ascending => keyed.sort_by(|a, b| a.0.compare(&b.0)),
        SortDirection::Descending => keyed.sort_by(|a, b| b.0.compare(&a.0)),
    }

    keyed.into_iter().map(|(_, row)| row).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Status;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn row(id: u64, label: &str, value: f64) -> Row {
        let mut r = Row::blank(id, today());
        r.job_request = label.to_string();
        r.est_value = value;
        r
    }

    fn ids(rows: &[&Row]) -> Vec<u64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_numeric_descending_scenario() {
        let mut a = row(1, "Fix bug", 500.0);
        a.status = Status::Complete;
        let b = row(2, "Write docs", 200.0);
        let rows = vec![&b, &a];
        let sorted = apply_sort(rows, Some(&SortDirective::descending(Field::EstValue)));
        assert_eq!(ids(&sorted), vec![1, 2]);
    }

    #[test]
    fn test_numbers_ascending() {
        let rows = vec![row(1, "a", 30.0), row(2, "b", 5.0), row(3, "c", 100.0)];
        let sorted = apply_sort(rows.iter().collect(), Some(&SortDirective::ascending(Field::EstValue)));
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_ids_sort_numerically() {
        let rows = vec![row(10, "a", 0.0), row(9, "b", 0.0), row(100, "c", 0.0)];
        let sorted = apply_sort(rows.iter().collect(), Some(&SortDirective::ascending(Field::Id)));
        assert_eq!(ids(&sorted), vec![9, 10, 100]);
        let sorted = apply_sort(rows.iter().collect(), Some(&SortDirective::descending(Field::Id)));
        assert_eq!(ids(&sorted), vec![100, 10, 9]);
    }

    #[test]
    fn test_text_case_insensitive() {
        let rows = vec![row(1, "banana", 0.0), row(2, "Apple", 0.0), row(3, "cherry", 0.0)];
        let sorted = apply_sort(rows.iter().collect(), Some(&SortDirective::ascending(Field::JobRequest)));
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_no_directive_preserves_order() {
        let rows = vec![row(3, "c", 1.0), row(1, "a", 2.0), row(2, "b", 3.0)];
        let sorted = apply_sort(rows.iter().collect(), None);
        assert_eq!(ids(&sorted), vec![3, 1, 2]);
    }

    #[test]
    fn test_stability_both_directions() {
        let rows = vec![
            row(1, "x", 10.0),
            row(2, "y", 5.0),
            row(3, "z", 10.0),
            row(4, "w", 5.0),
        ];
        let asc = apply_sort(rows.iter().collect(), Some(&SortDirective::ascending(Field::EstValue)));
        assert_eq!(ids(&asc), vec![2, 4, 1, 3]);
        let desc = apply_sort(rows.iter().collect(), Some(&SortDirective::descending(Field::EstValue)));
        assert_eq!(ids(&desc), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_dates_chronological() {
        let mut a = row(1, "a", 0.0);
        a.due_date = "2024-03-01".into();
        let mut b = row(2, "b", 0.0);
        b.due_date = "2023-12-31".into();
        let mut c = row(3, "c", 0.0);
        c.due_date = "2024-01-15".into();
        let rows = vec![a, b, c];
        let sorted = apply_sort(rows.iter().collect(), Some(&SortDirective::ascending(Field::DueDate)));
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
    }

    #[test]
    fn test_unparseable_dates_bucket() {
        let mut a = row(1, "a", 0.0);
        a.due_date = "".into();
        let mut b = row(2, "b", 0.0);
        b.due_date = "2024-02-01".into();
        let mut c = row(3, "c", 0.0);
        c.due_date = "someday".into();
        let mut d = row(4, "d", 0.0);
        d.due_date = "2024-01-01".into();
        let rows = vec![a, b, c, d];

        // Ascending: valid dates first, then the unparseable bucket in input order
        let asc = apply_sort(rows.iter().collect(), Some(&SortDirective::ascending(Field::DueDate)));
        assert_eq!(ids(&asc), vec![4, 2, 1, 3]);

        // Descending: unparseable bucket first (still in input order), then dates newest first
        let desc = apply_sort(rows.iter().collect(), Some(&SortDirective::descending(Field::DueDate)));
        assert_eq!(ids(&desc), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_cycle() {
        let f = Field::JobRequest;
        let asc = SortDirective::cycle(None, f, true);
        assert_eq!(asc, Some(SortDirective::ascending(f)));
        let desc = SortDirective::cycle(asc, f, true);
        assert_eq!(desc, Some(SortDirective::descending(f)));
        assert_eq!(SortDirective::cycle(desc, f, true), None);

        // Other field restarts at ascending
        assert_eq!(
            SortDirective::cycle(desc, Field::EstValue, true),
            Some(SortDirective::ascending(Field::EstValue))
        );
        // Non-sortable leaves it alone
        assert_eq!(SortDirective::cycle(desc, Field::Url, false), desc);
    }
}
