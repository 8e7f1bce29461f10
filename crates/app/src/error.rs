use std::fmt;

use tasksheet_config::StoreError;
use tasksheet_core::{CommitError, StateError};
use tasksheet_engine::{ColumnError, RecordError, ValidationError};
use tasksheet_io::CodecError;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Codec(CodecError),
    Store(StoreError),
    Record(RecordError),
    Column(ColumnError),
    Validation(ValidationError),
    Commit(CommitError),
    State(StateError),
    /// No sheet with this id in the catalog
    UnknownSheet(String),
    /// The operation needs an open sheet
    NoSheetOpen,
    /// Sheet names must not be blank
    InvalidName,
    /// Export or share with no displayed rows
    NothingToExport,
    /// A stored value could not be serialized
    Serialize(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Codec(e) => write!(f, "{}", e),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Record(e) => write!(f, "{}", e),
            AppError::Column(e) => write!(f, "{}", e),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Commit(e) => write!(f, "{}", e),
            AppError::State(e) => write!(f, "{}", e),
            AppError::UnknownSheet(id) => write!(f, "no sheet with id '{}'", id),
            AppError::NoSheetOpen => write!(f, "no sheet is open"),
            AppError::InvalidName => write!(f, "sheet name must not be blank"),
            AppError::NothingToExport => write!(f, "no data to export, add some rows first"),
            AppError::Serialize(msg) => write!(f, "cannot serialize sheet: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Codec(e) => Some(e),
            AppError::Store(e) => Some(e),
            AppError::Record(e) => Some(e),
            AppError::Column(e) => Some(e),
            AppError::Validation(e) => Some(e),
            AppError::Commit(e) => Some(e),
            AppError::State(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        AppError::Codec(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        AppError::Record(e)
    }
}

impl From<ColumnError> for AppError {
    fn from(e: ColumnError) -> Self {
        AppError::Column(e)
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<CommitError> for AppError {
    fn from(e: CommitError) -> Self {
        AppError::Commit(e)
    }
}

impl From<StateError> for AppError {
    fn from(e: StateError) -> Self {
        AppError::State(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialize(e.to_string())
    }
}
