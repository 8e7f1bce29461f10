use std::fmt;

use crate::row::{Field, RowId};
use crate::column::ValueKind;

/// A field value rejected by its kind's format check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The field cannot be written through an edit (row id).
    ReadOnly(Field),
    /// Select field given text that names no member of its set.
    UnknownOption { field: Field, value: String },
    /// Date field given text that does not parse as a calendar date.
    InvalidDate { field: Field, value: String },
    /// Currency field given text that does not parse as a number.
    InvalidNumber { field: Field, value: String },
    /// URL field given text that looks like neither a URL nor a host.
    InvalidUrl(String),
    /// Required text field left blank.
    Blank(Field),
    /// A typed value was routed to a field of another type.
    KindMismatch(Field),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly(field) => write!(f, "field '{}' is read-only", field.key()),
            Self::UnknownOption { field, value } => {
                write!(f, "'{value}' is not a valid {}", field.key())
            }
            Self::InvalidDate { field, value } => {
                write!(f, "{}: cannot parse date '{value}'", field.key())
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "{}: cannot parse number '{value}'", field.key())
            }
            Self::InvalidUrl(value) => write!(f, "'{value}' is not a valid URL"),
            Self::Blank(field) => write!(f, "{} must not be blank", field.key()),
            Self::KindMismatch(field) => write!(f, "value type does not match field '{}'", field.key()),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Column descriptor set rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnError {
    /// Descriptor kind disagrees with the field's declared type.
    KindMismatch { field: Field, declared: ValueKind, expected: ValueKind },
    /// Same field described twice.
    DuplicateField(Field),
    /// The row id is not a displayable column.
    IdColumn,
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { field, declared, expected } => write!(
                f,
                "column '{}' declared as {declared}, field type is {expected}",
                field.key()
            ),
            Self::DuplicateField(field) => write!(f, "column '{}' declared twice", field.key()),
            Self::IdColumn => write!(f, "the id field cannot be a column"),
        }
    }
}

impl std::error::Error for ColumnError {}

/// Row collection invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    DuplicateId(RowId),
    /// Id above [`crate::row::MAX_ROW_ID`]
    IdOutOfRange(RowId),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate row id {id}"),
            Self::IdOutOfRange(id) => write!(f, "row id {id} is out of range"),
        }
    }
}

impl std::error::Error for RecordError {}
