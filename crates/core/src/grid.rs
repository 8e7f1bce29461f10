//! Grid interaction state machine.
//!
//! ```text
//! Idle --select--> Selected --begin_edit--> Editing
//!                     ^                        |
//!                     +----commit / cancel-----+
//! any --reset--> Idle
//! ```
//!
//! Navigation keys act only in `Selected`. While `Editing` every navigation
//! key belongs to the editor and is ignored here. Movement is bounded with no
//! wraparound: rows run over the [`RowSpace`] (displayed rows, then virtual
//! rows), columns over the visible column order.

use tasksheet_engine::{CellCommit, Field, RowCollection};

use crate::edit::EditSession;
use crate::error::{CommitError, StateError};
use crate::mode::NavKey;
use crate::selection::{AnchorRect, CellCoord, RowSpace};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GridState {
    #[default]
    Idle,
    Selected(CellCoord),
    Editing(EditSession),
}

#[derive(Debug, Clone, Default)]
pub struct Grid {
    state: GridState,
    /// Visible columns, left to right
    columns: Vec<Field>,
    rows: RowSpace,
}

impl Grid {
    pub fn new(columns: Vec<Field>, rows: RowSpace) -> Self {
        Self {
            state: GridState::Idle,
            columns,
            rows,
        }
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    pub fn rows(&self) -> &RowSpace {
        &self.rows
    }

    /// The addressed cell, selected or being edited.
    pub fn selection(&self) -> Option<CellCoord> {
        match &self.state {
            GridState::Idle => None,
            GridState::Selected(coord) => Some(*coord),
            GridState::Editing(session) => Some(session.coord()),
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            GridState::Editing(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, GridState::Editing(_))
    }

    fn addressable(&self, coord: CellCoord) -> bool {
        self.rows.contains(coord.row) && self.columns.contains(&coord.field)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select a cell (click). Ignored while editing or when the cell is not
    /// in the grid. Returns whether the selection changed.
    pub fn select(&mut self, coord: CellCoord) -> bool {
        if self.is_editing() || !self.addressable(coord) {
            return false;
        }
        if self.selection() == Some(coord) {
            return false;
        }
        log::debug!("grid: select {}:{}", coord.row, coord.field);
        self.state = GridState::Selected(coord);
        true
    }

    /// Move the selection. Returns whether it moved.
    pub fn handle_key(&mut self, key: NavKey) -> bool {
        let GridState::Selected(coord) = self.state else {
            return false;
        };
        let (Some(row_pos), Some(col_pos)) = (
            self.rows.position_of(coord.row),
            self.columns.iter().position(|&f| f == coord.field),
        ) else {
            return false;
        };

        let (dr, dc) = key.delta();
        let new_row = step(row_pos, dr, self.rows.len());
        let new_col = step(col_pos, dc, self.columns.len());
        if new_row == row_pos && new_col == col_pos {
            return false;
        }

        let (Some(row), Some(&field)) = (self.rows.id_at(new_row), self.columns.get(new_col)) else {
            return false;
        };
        self.state = GridState::Selected(CellCoord::new(row, field));
        true
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Open an editor on the selected cell.
    pub fn begin_edit(&mut self, rows: &RowCollection, anchor: AnchorRect) -> Result<(), StateError> {
        let coord = match &self.state {
            GridState::Idle => return Err(StateError::NoSelection),
            GridState::Editing(_) => return Err(StateError::SessionAlreadyOpen),
            GridState::Selected(coord) => *coord,
        };
        let session = EditSession::begin(rows, coord, anchor)?;
        log::debug!("grid: edit {}:{}", coord.row, coord.field);
        self.state = GridState::Editing(session);
        Ok(())
    }

    /// Select `coord` and open an editor on it (double-click).
    pub fn begin_edit_at(
        &mut self,
        rows: &RowCollection,
        coord: CellCoord,
        anchor: AnchorRect,
    ) -> Result<(), StateError> {
        if self.is_editing() {
            return Err(StateError::SessionAlreadyOpen);
        }
        if !self.addressable(coord) {
            return Err(StateError::NoSelection);
        }
        self.state = GridState::Selected(coord);
        self.begin_edit(rows, anchor)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), StateError> {
        match &mut self.state {
            GridState::Editing(session) => {
                session.set_draft(text);
                Ok(())
            }
            _ => Err(StateError::NotEditing),
        }
    }

    /// Close the editor and hand back the coerced edit.
    ///
    /// On a validation error the session stays open with its draft.
    pub fn commit(&mut self, strict_dates: bool) -> Result<CellCommit, CommitError> {
        let GridState::Editing(session) = &self.state else {
            return Err(StateError::NotEditing.into());
        };
        let commit = session.commit(strict_dates)?;
        let coord = session.coord();
        log::debug!("grid: commit {}:{}", commit.row, commit.field);
        self.state = GridState::Selected(coord);
        Ok(commit)
    }

    /// Drop the editor without writing anything.
    pub fn cancel(&mut self) -> Result<(), StateError> {
        let GridState::Editing(session) = &self.state else {
            return Err(StateError::NotEditing);
        };
        let coord = session.coord();
        self.state = GridState::Selected(coord);
        Ok(())
    }

    /// Tear down: no selection, no editor.
    pub fn reset(&mut self) {
        if self.state != GridState::Idle {
            log::debug!("grid: reset");
        }
        self.state = GridState::Idle;
    }

    // ========================================================================
    // Address space changes
    // ========================================================================

    /// New visible column order.
    ///
    /// A selection on a column that is no longer visible moves to the nearest
    /// visible column in schema order, and an editor on it is cancelled. With
    /// no visible columns the grid goes idle.
    pub fn set_columns(&mut self, columns: Vec<Field>) {
        self.columns = columns;
        let Some(coord) = self.selection() else {
            return;
        };
        if self.columns.contains(&coord.field) {
            return;
        }
        match nearest_column(&self.columns, coord.field) {
            Some(field) => {
                log::debug!("grid: column {} hidden, selection moves to {}", coord.field, field);
                self.state = GridState::Selected(CellCoord::new(coord.row, field));
            }
            None => self.reset(),
        }
    }

    /// New row address space (after a recompute of the displayed rows).
    ///
    /// A plain selection whose row is gone is cleared. An open editor is kept:
    /// its commit upserts by id.
    pub fn set_rows(&mut self, rows: RowSpace) {
        self.rows = rows;
        if let GridState::Selected(coord) = self.state {
            if !self.rows.contains(coord.row) {
                self.reset();
            }
        }
    }
}

fn step(pos: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return pos;
    }
    pos.saturating_add_signed(delta).min(len - 1)
}

fn schema_index(field: Field) -> usize {
    Field::ALL.iter().position(|&f| f == field).unwrap_or(0)
}

/// Closest column by schema position; ties go left.
fn nearest_column(columns: &[Field], hidden: Field) -> Option<Field> {
    let target = schema_index(hidden);
    columns
        .iter()
        .copied()
        .min_by_key(|&f| {
            let i = schema_index(f);
            (i.abs_diff(target), i)
        })
}
