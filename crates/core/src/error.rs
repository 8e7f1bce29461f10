use std::fmt;

use tasksheet_engine::ValidationError;

/// Grid state-machine contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// An edit session is already open
    SessionAlreadyOpen,
    /// The operation needs a selected cell
    NoSelection,
    /// The operation needs an open edit session
    NotEditing,
    /// The selected field cannot be edited
    ReadOnlyField,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::SessionAlreadyOpen => write!(f, "an edit session is already open"),
            StateError::NoSelection => write!(f, "no cell is selected"),
            StateError::NotEditing => write!(f, "no edit session is open"),
            StateError::ReadOnlyField => write!(f, "the selected field is read-only"),
        }
    }
}

impl std::error::Error for StateError {}

/// Why a commit did not produce a [`tasksheet_engine::CellCommit`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommitError {
    State(StateError),
    /// The draft was rejected; the session stays open
    Invalid(ValidationError),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitError::State(e) => write!(f, "{}", e),
            CommitError::Invalid(e) => write!(f, "invalid value: {}", e),
        }
    }
}

impl std::error::Error for CommitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommitError::State(e) => Some(e),
            CommitError::Invalid(e) => Some(e),
        }
    }
}

impl From<StateError> for CommitError {
    fn from(e: StateError) -> Self {
        CommitError::State(e)
    }
}

impl From<ValidationError> for CommitError {
    fn from(e: ValidationError) -> Self {
        CommitError::Invalid(e)
    }
}
