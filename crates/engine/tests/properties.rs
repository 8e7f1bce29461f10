// Property-based tests for the filter and sort engines.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use chrono::NaiveDate;
use proptest::prelude::*;
use tasksheet_engine::filter::{apply_filters, FilterClause, FilterOperator};
use tasksheet_engine::row::{Field, Priority, Row, Status};
use tasksheet_engine::sort::{apply_sort, compare_rows, SortDirective};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_status() -> impl Strategy<Value = Status> {
    prop::sample::select(Status::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

/// Mostly valid ISO dates, sometimes junk or empty.
fn arb_date() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (2020i32..2027, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
        1 => Just(String::new()),
        1 => r"[a-z]{1,6}",
    ]
}

/// Rows with ids 1..=n, small value domains so ties are common.
fn arb_rows(max: usize) -> impl Strategy<Value = Vec<Row>> {
    proptest::collection::vec(
        (
            r"[A-Za-z ]{0,8}",
            arb_date(),
            arb_status(),
            r"[a-c]{0,2}",
            arb_priority(),
            arb_date(),
            0u32..20,
        ),
        0..max,
    )
    .prop_map(|specs| {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (label, submitted, status, who, priority, due, value))| {
                let mut r = Row::blank(i as u64 + 1, today);
                r.job_request = label;
                r.submitted = submitted;
                r.status = status;
                r.assigned = who;
                r.priority = priority;
                r.due_date = due;
                r.est_value = f64::from(value * 50);
                r
            })
            .collect()
    })
}

fn arb_operator() -> impl Strategy<Value = FilterOperator> {
    prop::sample::select(vec![
        FilterOperator::Equals,
        FilterOperator::Contains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::Unknown,
    ])
}

fn arb_field() -> impl Strategy<Value = Field> {
    prop::sample::select(Field::ALL.to_vec())
}

fn arb_clauses() -> impl Strategy<Value = Vec<FilterClause>> {
    proptest::collection::vec(
        (arb_field(), arb_operator(), r"[a-z0-9]{1,3}")
            .prop_map(|(f, op, v)| FilterClause::new(f, op, v)),
        1..4,
    )
}

fn sortable_field() -> impl Strategy<Value = Field> {
    prop::sample::select(vec![
        Field::JobRequest,
        Field::Submitted,
        Field::Status,
        Field::Assigned,
        Field::Priority,
        Field::DueDate,
        Field::EstValue,
    ])
}

fn ids(rows: &[&Row]) -> Vec<u64> {
    rows.iter().map(|r| r.id).collect()
}

// ---------------------------------------------------------------------------
// Filter properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn filter_is_idempotent(rows in arb_rows(30), clauses in arb_clauses()) {
        let once = apply_filters(&rows, &clauses);
        let twice = apply_filters(once.iter().copied(), &clauses);
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn filter_output_is_subsequence_satisfying_all_clauses(
        rows in arb_rows(30),
        clauses in arb_clauses(),
    ) {
        let out = apply_filters(&rows, &clauses);
        prop_assert!(out.len() <= rows.len());
        for row in &out {
            for clause in &clauses {
                prop_assert!(clause.matches(row));
            }
        }
        // Order preserved
        let out_ids = ids(&out);
        let mut sorted = out_ids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(out_ids, sorted);
    }

    #[test]
    fn sort_never_reintroduces_filtered_rows(
        rows in arb_rows(30),
        clauses in arb_clauses(),
        field in sortable_field(),
    ) {
        let filtered = apply_filters(&rows, &clauses);
        let n = filtered.len();
        let sorted = apply_sort(filtered, Some(&SortDirective::descending(field)));
        prop_assert_eq!(sorted.len(), n);
        for row in &sorted {
            prop_assert!(clauses.iter().all(|c| c.matches(row)));
        }
    }
}

// ---------------------------------------------------------------------------
// Sort properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn sort_is_stable_in_both_directions(rows in arb_rows(30), field in sortable_field()) {
        for directive in [SortDirective::ascending(field), SortDirective::descending(field)] {
            let sorted = apply_sort(rows.iter().collect(), Some(&directive));
            // Ties keep input order; input ids are increasing
            for pair in sorted.windows(2) {
                if compare_rows(pair[0], pair[1], field) == std::cmp::Ordering::Equal {
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }
    }

    #[test]
    fn resort_is_idempotent(rows in arb_rows(30), field in sortable_field()) {
        let d = SortDirective::ascending(field);
        let once = apply_sort(rows.iter().collect(), Some(&d));
        let twice = apply_sort(once.clone(), Some(&d));
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn descending_is_reversed_ascending_without_ties(values in proptest::collection::hash_set(0u32..10_000, 0..30)) {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows: Vec<Row> = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let mut r = Row::blank(i as u64 + 1, today);
                r.est_value = f64::from(v);
                r.job_request = format!("task-{v:05}");
                r
            })
            .collect();

        for field in [Field::EstValue, Field::JobRequest] {
            let mut asc = ids(&apply_sort(rows.iter().collect(), Some(&SortDirective::ascending(field))));
            let desc = ids(&apply_sort(rows.iter().collect(), Some(&SortDirective::descending(field))));
            asc.reverse();
            prop_assert_eq!(asc, desc);
        }
    }
}
