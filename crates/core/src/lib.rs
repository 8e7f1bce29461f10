//! `tasksheet-core`: grid interaction. Cell addressing, keyboard navigation
//! and the single cell edit session.
//!
//! The grid never mutates rows. A commit yields a
//! [`tasksheet_engine::CellCommit`] that the owner of the row collection applies.

pub mod edit;
pub mod error;
pub mod grid;
pub mod mode;
pub mod selection;

pub use edit::EditSession;
pub use error::{CommitError, StateError};
pub use grid::{Grid, GridState};
pub use mode::NavKey;
pub use selection::{AnchorRect, CellCoord, RowSpace};
