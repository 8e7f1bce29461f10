//! `tasksheet-engine`: rows, columns, and the filter/sort view pipeline.
//!
//! Pure crate: no IO, no storage. Callers own the row collection and ask the
//! pipeline what to display.

pub mod collection;
pub mod column;
pub mod error;
pub mod filter;
pub mod row;
pub mod sort;
pub mod template;
pub mod value;
pub mod view;

pub use collection::{CellCommit, RowCollection, UpsertOutcome};
pub use column::{ColumnDescriptor, ColumnSet, ValueKind};
pub use error::{ColumnError, RecordError, ValidationError};
pub use filter::{FilterClause, FilterOperator};
pub use row::{Field, FieldValue, Priority, Row, RowId, Status, MAX_ROW_ID};
pub use sort::{SortDirection, SortDirective};
pub use template::Template;
pub use view::{Category, ViewPipeline};
