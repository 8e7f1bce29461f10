//! `tasksheet-app`: sheet catalog and open-sheet controller.
//!
//! Wires the engine, grid, codec and storage crates together. Hosts use
//! [`Workspace`] (single-threaded, one open sheet) or [`SheetService`]
//! (shared, one lock per sheet).

pub mod catalog;
mod error;
pub mod service;
pub mod sheet;
pub mod workspace;

pub use catalog::{SheetCatalog, SheetMeta};
pub use error::AppError;
pub use service::{SharedSheet, SheetService};
pub use sheet::SheetContext;
pub use workspace::Workspace;
