// JSON import/export

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use tasksheet_engine::{ColumnDescriptor, FilterClause, Row, SortDirective, MAX_ROW_ID};

use crate::error::CodecError;

pub const SHARE_FILENAME: &str = "spreadsheet-share.json";

/// Parse a JSON list of row records.
///
/// The payload is trusted: ids and values are taken as given, and missing
/// members get their empty defaults. Only repeated ids and ids above
/// [`MAX_ROW_ID`] are rejected.
pub fn import_rows(content: &str) -> Result<Vec<Row>, CodecError> {
    let rows: Vec<Row> = serde_json::from_str(content)?;
    let mut seen = FxHashSet::default();
    for row in &rows {
        if row.id > MAX_ROW_ID {
            return Err(CodecError::IdOutOfRange(row.id));
        }
        if !seen.insert(row.id) {
            return Err(CodecError::DuplicateId(row.id));
        }
    }
    Ok(rows)
}

/// Rows as a pretty-printed JSON array, ids included.
pub fn export_rows<'a, I>(rows: I) -> Result<String, CodecError>
where
    I: IntoIterator<Item = &'a Row>,
{
    let rows: Vec<&Row> = rows.into_iter().collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Snapshot of what the user is looking at: the displayed rows, the view
/// state that produced them and the visible columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub data: Vec<Row>,
    pub filters: Vec<FilterClause>,
    pub sort_config: Option<SortDirective>,
    pub columns: Vec<ColumnDescriptor>,
}

impl SharePayload {
    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(content)?)
    }
}
