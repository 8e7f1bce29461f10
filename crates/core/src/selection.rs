use serde::{Deserialize, Serialize};

use tasksheet_engine::row::{Field, RowId};

/// The addressed cell: a row id (real or virtual) and a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: RowId,
    pub field: Field,
}

impl CellCoord {
    pub fn new(row: RowId, field: Field) -> Self {
        Self { row, field }
    }
}

/// Screen-space rectangle of the edited cell, relative to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl AnchorRect {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self { top, left, width, height }
    }
}

/// Addressable rows: the displayed rows, then `padding` virtual rows.
///
/// Virtual row ids start above the largest id in the whole collection
/// (filtered-out rows included), so a virtual id is never a real id.
/// Positions are 0-based; position 0 is the first displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSpace {
    rows: Vec<RowId>,
    first_virtual: RowId,
    padding: usize,
}

impl RowSpace {
    /// Virtual rows are capped so the last virtual id fits in a [`RowId`].
    pub fn new(displayed: Vec<RowId>, max_id: RowId, padding: usize) -> Self {
        let room = usize::try_from(RowId::MAX - max_id).unwrap_or(usize::MAX);
        Self {
            rows: displayed,
            first_virtual: max_id.saturating_add(1),
            padding: padding.min(room),
        }
    }

    /// Total addressable rows (real + virtual)
    pub fn len(&self) -> usize {
        self.rows.len() + self.padding
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn real_count(&self) -> usize {
        self.rows.len()
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn id_at(&self, pos: usize) -> Option<RowId> {
        if pos < self.rows.len() {
            return Some(self.rows[pos]);
        }
        let offset = pos - self.rows.len();
        (offset < self.padding).then(|| self.first_virtual + offset as RowId)
    }

    pub fn position_of(&self, id: RowId) -> Option<usize> {
        if let Some(pos) = self.rows.iter().position(|&r| r == id) {
            return Some(pos);
        }
        self.is_virtual(id)
            .then(|| self.rows.len() + (id - self.first_virtual) as usize)
    }

    pub fn is_virtual(&self, id: RowId) -> bool {
        id >= self.first_virtual && id - self.first_virtual < self.padding as RowId
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.position_of(id).is_some()
    }

    /// Id of the first virtual row (where "add your first row" lives).
    pub fn first_virtual(&self) -> Option<RowId> {
        (self.padding > 0).then_some(self.first_virtual)
    }
}
