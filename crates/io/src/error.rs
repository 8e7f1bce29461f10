use std::fmt;

use tasksheet_engine::RowId;

/// Import/export failure. A failed import never touches the caller's rows.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Structured payload is not a JSON list of records
    Json(String),
    /// Delimited text could not be read or written
    Csv(String),
    /// No header line
    Empty,
    /// None of the headers name a known field
    NoRecognizedColumns,
    /// File extension is not .json, .csv, .tsv or .txt
    UnsupportedFormat(String),
    /// Structured payload repeats a row id
    DuplicateId(RowId),
    /// Structured payload has an id above [`tasksheet_engine::MAX_ROW_ID`]
    IdOutOfRange(RowId),
    Io(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Json(msg) => write!(f, "invalid JSON data: {}", msg),
            CodecError::Csv(msg) => write!(f, "invalid delimited text: {}", msg),
            CodecError::Empty => write!(f, "file has no header line"),
            CodecError::NoRecognizedColumns => write!(f, "no recognized column headers"),
            CodecError::UnsupportedFormat(name) => write!(f, "unsupported file type: {}", name),
            CodecError::DuplicateId(id) => write!(f, "duplicate row id {} in payload", id),
            CodecError::IdOutOfRange(id) => write!(f, "row id {} is out of range", id),
            CodecError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}

impl From<csv::Error> for CodecError {
    fn from(e: csv::Error) -> Self {
        CodecError::Csv(e.to_string())
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        CodecError::Io(e.to_string())
    }
}
