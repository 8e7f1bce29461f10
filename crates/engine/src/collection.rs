//! Row collection: the raw rows of one sheet, in insertion order.
//!
//! Every mutation bumps `revision`, and every collection carries a process-unique
//! `instance` number. The view pipeline keys its cache on both, so a recompute
//! after a commit can never see the pre-commit rows, and switching sheets can
//! never reuse another sheet's cached view.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::error::{RecordError, ValidationError};
use crate::row::{Field, FieldValue, Row, RowId, MAX_ROW_ID};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// One committed cell edit: write `value` into `field` of row `row`,
/// creating the row if it does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCommit {
    pub row: RowId,
    pub field: Field,
    pub value: FieldValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated,
    Created,
}

#[derive(Debug)]
pub struct RowCollection {
    rows: Vec<Row>,
    /// id -> index into `rows`
    index: FxHashMap<RowId, usize>,
    revision: u64,
    instance: u64,
}

impl Default for RowCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RowCollection {
    /// A clone is a different collection: it gets its own instance number.
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            index: self.index.clone(),
            revision: self.revision,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl RowCollection {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: FxHashMap::default(),
            revision: 0,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Build from rows, rejecting duplicate ids and ids above [`MAX_ROW_ID`].
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, RecordError> {
        let index = build_index(&rows)?;
        Ok(Self {
            rows,
            index,
            revision: 0,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.index.get(&id).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn max_id(&self) -> RowId {
        self.rows.iter().map(|r| r.id).max().unwrap_or(0)
    }

    /// Smallest id greater than every id in the collection.
    pub fn next_id(&self) -> RowId {
        self.max_id().saturating_add(1)
    }

    /// Apply a committed edit.
    ///
    /// Existing row: only `commit.field` changes. Missing row: a new row is
    /// appended with id `commit.row`, the edited field set, and every other
    /// field at its [`Row::blank`] default.
    pub fn apply_commit(
        &mut self,
        commit: CellCommit,
        today: NaiveDate,
    ) -> Result<UpsertOutcome, ValidationError> {
        if let Some(&i) = self.index.get(&commit.row) {
            self.rows[i].apply(commit.field, commit.value)?;
            self.revision += 1;
            return Ok(UpsertOutcome::Updated);
        }

        let mut row = Row::blank(commit.row, today);
        row.apply(commit.field, commit.value)?;
        self.index.insert(row.id, self.rows.len());
        self.rows.push(row);
        self.revision += 1;
        Ok(UpsertOutcome::Created)
    }

    /// Append a blank row with a fresh id.
    pub fn push_blank(&mut self, today: NaiveDate) -> RowId {
        let id = self.next_id();
        self.index.insert(id, self.rows.len());
        self.rows.push(Row::blank(id, today));
        self.revision += 1;
        id
    }

    /// Replace every row at once. On error nothing changes.
    pub fn replace_all(&mut self, rows: Vec<Row>) -> Result<(), RecordError> {
        let index = build_index(&rows)?;
        self.rows = rows;
        self.index = index;
        self.revision += 1;
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<Row> {
        self.rows.clone()
    }
}

fn build_index(rows: &[Row]) -> Result<FxHashMap<RowId, usize>, RecordError> {
    let mut index = FxHashMap::default();
    index.reserve(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.id > MAX_ROW_ID {
            return Err(RecordError::IdOutOfRange(row.id));
        }
        if index.insert(row.id, i).is_some() {
            return Err(RecordError::DuplicateId(row.id));
        }
    }
    Ok(index)
}
