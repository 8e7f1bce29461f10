//! Column descriptors: how each field is labeled, sized, edited and shown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ColumnError;
use crate::row::Field;

/// Value kind tag. Picks the editor widget and display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Date,
    Select,
    Currency,
    Url,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Date => write!(f, "date"),
            Self::Select => write!(f, "select"),
            Self::Currency => write!(f, "currency"),
            Self::Url => write!(f, "url"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "key")]
    pub field: Field,
    pub label: String,
    /// Relative width hint (grid units)
    pub width: u16,
    pub sortable: bool,
    /// Hidden columns are not rendered and not navigable
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(rename = "type")]
    pub kind: ValueKind,
}

impl ColumnDescriptor {
    /// Descriptor using the field's own kind.
    pub fn new(field: Field, label: impl Into<String>, width: u16, sortable: bool) -> Self {
        Self {
            field,
            label: label.into(),
            width,
            sortable,
            hidden: false,
            kind: field.kind(),
        }
    }
}

/// Ordered column descriptors for one sheet.
///
/// Invariants (checked by [`ColumnSet::new`] and on deserialize):
/// - every descriptor's kind matches its field's kind
/// - no field appears twice
/// - the row id is never a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnDescriptor>", into = "Vec<ColumnDescriptor>")]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self, ColumnError> {
        let mut seen = Vec::with_capacity(columns.len());
        for col in &columns {
            if col.field == Field::Id {
                return Err(ColumnError::IdColumn);
            }
            let expected = col.field.kind();
            if col.kind != expected {
                return Err(ColumnError::KindMismatch {
                    field: col.field,
                    declared: col.kind,
                    expected,
                });
            }
            if seen.contains(&col.field) {
                return Err(ColumnError::DuplicateField(col.field));
            }
            seen.push(col.field);
        }
        Ok(Self { columns })
    }

    /// For built-in column lists that are correct by construction.
    pub(crate) fn from_builtin(columns: Vec<ColumnDescriptor>) -> Self {
        debug_assert!(Self::new(columns.clone()).is_ok());
        Self { columns }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Visible columns, left to right.
    pub fn visible(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Navigation order: visible fields, left to right.
    pub fn visible_fields(&self) -> Vec<Field> {
        self.visible().map(|c| c.field).collect()
    }

    pub fn is_sortable(&self, field: Field) -> bool {
        self.get(field).is_some_and(|c| c.sortable)
    }

    /// Flip a column's hidden flag. Returns the new hidden state,
    /// or `None` when the sheet has no such column.
    pub fn toggle_visibility(&mut self, field: Field) -> Option<bool> {
        let col = self.columns.iter_mut().find(|c| c.field == field)?;
        col.hidden = !col.hidden;
        Some(col.hidden)
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        crate::template::Template::Blank.columns()
    }
}

impl TryFrom<Vec<ColumnDescriptor>> for ColumnSet {
    type Error = ColumnError;

    fn try_from(columns: Vec<ColumnDescriptor>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<ColumnSet> for Vec<ColumnDescriptor> {
    fn from(set: ColumnSet) -> Self {
        set.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns_valid() {
        let set = ColumnSet::default();
        assert_eq!(set.len(), 9);
        assert!(ColumnSet::new(set.iter().cloned().collect()).is_ok());
        assert_eq!(set.visible_fields().first(), Some(&Field::JobRequest));
        assert!(!set.is_sortable(Field::Url));
        assert!(set.is_sortable(Field::EstValue));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut col = ColumnDescriptor::new(Field::EstValue, "Amount", 32, true);
        col.kind = ValueKind::Text;
        assert_eq!(
            ColumnSet::new(vec![col]),
            Err(ColumnError::KindMismatch {
                field: Field::EstValue,
                declared: ValueKind::Text,
                expected: ValueKind::Currency,
            })
        );
    }

    #[test]
    fn test_duplicate_and_id_rejected() {
        let a = ColumnDescriptor::new(Field::Status, "Status", 36, true);
        assert_eq!(
            ColumnSet::new(vec![a.clone(), a]),
            Err(ColumnError::DuplicateField(Field::Status))
        );
        let id = ColumnDescriptor::new(Field::Id, "#", 12, false);
        assert_eq!(ColumnSet::new(vec![id]), Err(ColumnError::IdColumn));
    }

    #[test]
    fn test_toggle_visibility_changes_order() {
        let mut set = ColumnSet::default();
        assert_eq!(set.toggle_visibility(Field::Submitted), Some(true));
        let fields = set.visible_fields();
        assert_eq!(fields[0], Field::JobRequest);
        assert_eq!(fields[1], Field::Status);
        assert_eq!(set.toggle_visibility(Field::Submitted), Some(false));
        assert_eq!(set.visible_fields()[1], Field::Submitted);
        assert_eq!(set.toggle_visibility(Field::Id), None);
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"[{"key":"jobRequest","label":"Task","width":80,"sortable":true,"type":"text"}]"#;
        let set: ColumnSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.get(Field::JobRequest).unwrap().hidden);

        let bad = r#"[{"key":"estValue","label":"X","width":32,"sortable":true,"type":"date"}]"#;
        assert!(serde_json::from_str::<ColumnSet>(bad).is_err());
    }
}
