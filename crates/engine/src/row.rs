//! Row schema: the fixed record every sheet holds.
//!
//! A row is a closed struct. Code that needs "the value of field X" goes
//! through [`Row::text`] / [`Row::apply`], which match exhaustively on
//! [`Field`], so adding a field is a compile error everywhere it matters.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::column::ValueKind;
use crate::error::ValidationError;
use crate::value::{self, DateParse, NumberParse};

/// Row identifier. Unique within one sheet's row collection, never reassigned.
pub type RowId = u64;

/// Largest id a collection accepts: the largest integer a JSON number holds
/// exactly. Virtual ids above the largest row id cannot overflow.
pub const MAX_ROW_ID: RowId = (1 << 53) - 1;

// =============================================================================
// Closed-set fields
// =============================================================================

/// Work status. Serialized with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "Need to start")]
    NotStarted,
    #[serde(rename = "In-progress")]
    InProgress,
    Complete,
    Blocked,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::NotStarted,
        Status::InProgress,
        Status::Complete,
        Status::Blocked,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Status::NotStarted => "Need to start",
            Status::InProgress => "In-progress",
            Status::Complete => "Complete",
            Status::Blocked => "Blocked",
        }
    }

    /// Case-insensitive parse of a label or variant name.
    pub fn parse(text: &str) -> Option<Self> {
        let norm: String = text
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "needtostart" | "notstarted" | "pending" | "todo" => Some(Status::NotStarted),
            "inprogress" => Some(Status::InProgress),
            "complete" | "completed" | "done" => Some(Status::Complete),
            "blocked" => Some(Status::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Work priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" | "med" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Field: identity of one Row member
// =============================================================================

/// One member of [`Row`], in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    JobRequest,
    Submitted,
    Status,
    Submitter,
    Url,
    Assigned,
    Priority,
    DueDate,
    EstValue,
}

impl Field {
    /// Schema order. Export headers follow this order.
    pub const ALL: [Field; 10] = [
        Field::Id,
        Field::JobRequest,
        Field::Submitted,
        Field::Status,
        Field::Submitter,
        Field::Url,
        Field::Assigned,
        Field::Priority,
        Field::DueDate,
        Field::EstValue,
    ];

    /// Schema name (matches the serialized key)
    pub fn key(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::JobRequest => "jobRequest",
            Field::Submitted => "submitted",
            Field::Status => "status",
            Field::Submitter => "submitter",
            Field::Url => "url",
            Field::Assigned => "assigned",
            Field::Priority => "priority",
            Field::DueDate => "dueDate",
            Field::EstValue => "estValue",
        }
    }

    /// Case-insensitive lookup by schema name.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Field::ALL.into_iter().find(|f| f.key().eq_ignore_ascii_case(key))
    }

    /// The value kind this field's type implies.
    pub fn kind(&self) -> ValueKind {
        match self {
            Field::Id | Field::JobRequest | Field::Submitter | Field::Assigned => ValueKind::Text,
            Field::Submitted | Field::DueDate => ValueKind::Date,
            Field::Status | Field::Priority => ValueKind::Select,
            Field::Url => ValueKind::Url,
            Field::EstValue => ValueKind::Currency,
        }
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, Field::Id)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Field::Submitted | Field::DueDate)
    }

    /// Options offered by the select editor (empty for non-select fields).
    pub fn options(&self) -> Vec<&'static str> {
        match self {
            Field::Status => Status::ALL.iter().map(|s| s.label()).collect(),
            Field::Priority => Priority::ALL.iter().map(|p| p.label()).collect(),
            _ => Vec::new(),
        }
    }

    /// Turn editor draft text into a typed value for this field.
    ///
    /// Text and date fields keep the draft verbatim (dates are only checked
    /// when `strict_dates` is set). The estimated value falls back to 0.
    /// Select fields must name a member of their set.
    pub fn coerce(&self, draft: &str, strict_dates: bool) -> Result<FieldValue, ValidationError> {
        match self {
            Field::Id => Err(ValidationError::ReadOnly(*self)),
            Field::Status => Status::parse(draft).map(FieldValue::Status).ok_or_else(|| {
                ValidationError::UnknownOption { field: *self, value: draft.to_string() }
            }),
            Field::Priority => Priority::parse(draft).map(FieldValue::Priority).ok_or_else(|| {
                ValidationError::UnknownOption { field: *self, value: draft.to_string() }
            }),
            Field::EstValue => Ok(FieldValue::Amount(value::coerce_amount(draft))),
            Field::Submitted | Field::DueDate => {
                if strict_dates {
                    self.check_date(draft)?;
                }
                Ok(FieldValue::Text(draft.to_string()))
            }
            Field::JobRequest | Field::Submitter | Field::Url | Field::Assigned => {
                Ok(FieldValue::Text(draft.to_string()))
            }
        }
    }

    /// Strict format check for a candidate value.
    pub fn validate(&self, text: &str) -> Result<(), ValidationError> {
        match self {
            Field::Id => Err(ValidationError::ReadOnly(*self)),
            Field::EstValue => match value::parse_number(text) {
                NumberParse::Parsed(_) => Ok(()),
                NumberParse::Unparseable => Err(ValidationError::InvalidNumber {
                    field: *self,
                    value: text.to_string(),
                }),
            },
            Field::Submitted | Field::DueDate => match value::parse_date(text) {
                DateParse::Parsed(_) => Ok(()),
                DateParse::Unparseable => Err(ValidationError::InvalidDate {
                    field: *self,
                    value: text.to_string(),
                }),
            },
            Field::Url => {
                if looks_like_url(text) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidUrl(text.to_string()))
                }
            }
            Field::Status | Field::Priority => self.coerce(text, false).map(|_| ()),
            Field::JobRequest | Field::Submitter | Field::Assigned => {
                if text.trim().is_empty() {
                    Err(ValidationError::Blank(*self))
                } else {
                    Ok(())
                }
            }
        }
    }

    // Empty due dates are allowed
    fn check_date(&self, text: &str) -> Result<(), ValidationError> {
        if *self == Field::DueDate && text.trim().is_empty() {
            return Ok(());
        }
        self.validate(text)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn looks_like_url(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.contains(char::is_whitespace) {
        return false;
    }
    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"))
        .unwrap_or(text);
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty() && (host.contains('.') || host.starts_with("localhost"))
}

/// A coerced value ready to be written into one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Status(Status),
    Priority(Priority),
    Amount(f64),
}

// =============================================================================
// Row
// =============================================================================

/// Missing members deserialize to their [`Row::empty`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Row {
    pub id: RowId,
    pub job_request: String,
    /// ISO-8601 date text
    pub submitted: String,
    pub status: Status,
    pub submitter: String,
    /// May be schemeless (`example.com/x`)
    pub url: String,
    pub assigned: String,
    pub priority: Priority,
    /// ISO-8601 date text, may be empty
    pub due_date: String,
    pub est_value: f64,
}

impl Default for Row {
    fn default() -> Self {
        Row::empty(0)
    }
}

impl Row {
    /// A row with every text field empty (including `submitted`), status
    /// NotStarted, priority Medium and estimated value 0. Imports start here.
    pub fn empty(id: RowId) -> Self {
        Self {
            id,
            job_request: String::new(),
            submitted: String::new(),
            status: Status::default(),
            submitter: String::new(),
            url: String::new(),
            assigned: String::new(),
            priority: Priority::default(),
            due_date: String::new(),
            est_value: 0.0,
        }
    }

    /// A new row as the grid creates it: [`Row::empty`] submitted today.
    pub fn blank(id: RowId, today: NaiveDate) -> Self {
        Self {
            submitted: today.format("%Y-%m-%d").to_string(),
            ..Self::empty(id)
        }
    }

    /// Field value as text (what filters compare and the editor is seeded with).
    pub fn text(&self, field: Field) -> String {
        match field {
            Field::Id => self.id.to_string(),
            Field::JobRequest => self.job_request.clone(),
            Field::Submitted => self.submitted.clone(),
            Field::Status => self.status.label().to_string(),
            Field::Submitter => self.submitter.clone(),
            Field::Url => self.url.clone(),
            Field::Assigned => self.assigned.clone(),
            Field::Priority => self.priority.label().to_string(),
            Field::DueDate => self.due_date.clone(),
            Field::EstValue => value::format_number(self.est_value),
        }
    }

    /// Write one field. The id can never be written.
    pub fn apply(&mut self, field: Field, value: FieldValue) -> Result<(), ValidationError> {
        match (field, value) {
            (Field::Id, _) => return Err(ValidationError::ReadOnly(field)),
            (Field::JobRequest, FieldValue::Text(s)) => self.job_request = s,
            (Field::Submitted, FieldValue::Text(s)) => self.submitted = s,
            (Field::Submitter, FieldValue::Text(s)) => self.submitter = s,
            (Field::Url, FieldValue::Text(s)) => self.url = s,
            (Field::Assigned, FieldValue::Text(s)) => self.assigned = s,
            (Field::DueDate, FieldValue::Text(s)) => self.due_date = s,
            (Field::Status, FieldValue::Status(s)) => self.status = s,
            (Field::Priority, FieldValue::Priority(p)) => self.priority = p,
            (Field::EstValue, FieldValue::Amount(n)) => self.est_value = n,
            (field, _) => return Err(ValidationError::KindMismatch(field)),
        }
        Ok(())
    }

    /// Link target for the url field, adding `https://` when schemeless.
    pub fn link(&self) -> Option<String> {
        let url = self.url.trim();
        if url.is_empty() {
            None
        } else if url.starts_with("http") {
            Some(url.to_string())
        } else {
            Some(format!("https://{url}"))
        }
    }
}
