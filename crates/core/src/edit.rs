//! Cell edit session: one open editor bound to one cell.
//!
//! The session holds a text draft and never touches the rows itself. Commit
//! coerces the draft into a typed [`CellCommit`]; the caller applies it to the
//! collection. Dropping the session is a cancel.

use tasksheet_engine::{CellCommit, RowCollection, ValidationError};

use crate::error::StateError;
use crate::selection::{AnchorRect, CellCoord};

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    coord: CellCoord,
    draft: String,
    /// Original text, for dirty checks
    original: String,
    anchor: AnchorRect,
}

impl EditSession {
    /// Open an editor on `coord`, seeded with the cell's current text.
    ///
    /// A coordinate whose row is not in `rows` (a virtual row) starts empty.
    pub fn begin(
        rows: &RowCollection,
        coord: CellCoord,
        anchor: AnchorRect,
    ) -> Result<Self, StateError> {
        if !coord.field.is_editable() {
            return Err(StateError::ReadOnlyField);
        }
        let original = rows
            .get(coord.row)
            .map(|row| row.text(coord.field))
            .unwrap_or_default();
        Ok(Self {
            coord,
            draft: original.clone(),
            original,
            anchor,
        })
    }

    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    pub fn anchor(&self) -> AnchorRect {
        self.anchor
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Options for a select editor; empty for free-text fields.
    pub fn options(&self) -> Vec<&'static str> {
        self.coord.field.options()
    }

    /// Coerce the draft for the bound field.
    pub fn commit(&self, strict_dates: bool) -> Result<CellCommit, ValidationError> {
        let value = self.coord.field.coerce(&self.draft, strict_dates)?;
        Ok(CellCommit {
            row: self.coord.row,
            field: self.coord.field,
            value,
        })
    }
}
