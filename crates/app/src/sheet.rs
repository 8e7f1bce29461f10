//! One open sheet: its rows, columns, view state and grid.
//!
//! Mutations only mark keys dirty. The owner ([`crate::Workspace`] or
//! [`crate::SheetService`]) calls [`SheetContext::save`] after each operation.

use chrono::{Local, NaiveDate};

use tasksheet_config::storage::{self, KeyValueStore};
use tasksheet_config::Settings;
use tasksheet_core::{AnchorRect, CellCoord, Grid, NavKey, RowSpace};
use tasksheet_engine::{
    Category, ColumnSet, Field, FilterClause, Row, RowCollection, RowId, SortDirective, Template,
    UpsertOutcome, ViewPipeline,
};
use tasksheet_io::json::{self, SharePayload, SHARE_FILENAME};
use tasksheet_io::{csv, Delimiter, ExportFile, FileInput};

use crate::error::AppError;

#[derive(Debug)]
pub struct SheetContext {
    id: String,
    rows: RowCollection,
    columns: ColumnSet,
    view: ViewPipeline,
    grid: Grid,

    // Settings captured at open
    padding: usize,
    strict_dates: bool,
    delimiter: Delimiter,
    export_prefix: String,

    /// Fixed date for new rows (tests); `None` means the local date
    today: Option<NaiveDate>,
    rows_dirty: bool,
    columns_dirty: bool,
}

impl SheetContext {
    /// Sheet over already-loaded rows and columns. View state starts fresh.
    pub fn new(id: impl Into<String>, rows: RowCollection, columns: ColumnSet, settings: &Settings) -> Self {
        let grid = Grid::new(columns.visible_fields(), RowSpace::default());
        let mut ctx = Self {
            id: id.into(),
            rows,
            columns,
            view: ViewPipeline::new(),
            grid,
            padding: settings.virtual_row_padding,
            strict_dates: settings.strict_dates,
            delimiter: Delimiter::from_setting(&settings.delimiter),
            export_prefix: settings.export_prefix.clone(),
            today: None,
            rows_dirty: false,
            columns_dirty: false,
        };
        ctx.refresh();
        ctx
    }

    /// Load a sheet's keys from the store.
    ///
    /// A missing key gives defaults (no rows, the template's columns). A value
    /// that does not parse is logged and replaced by the same defaults.
    pub fn load(
        store: &dyn KeyValueStore,
        id: &str,
        template: Template,
        settings: &Settings,
    ) -> Result<Self, AppError> {
        let rows = match store.get(&storage::data_key(id))? {
            Some(data) => parse_rows(&data).unwrap_or_else(|e| {
                log::warn!("sheet {}: stored rows are unreadable ({}), starting empty", id, e);
                RowCollection::new()
            }),
            None => RowCollection::new(),
        };
        let columns = match store.get(&storage::columns_key(id))? {
            Some(data) => serde_json::from_str::<ColumnSet>(&data).unwrap_or_else(|e| {
                log::warn!("sheet {}: stored columns are unreadable ({}), using template", id, e);
                template.columns()
            }),
            None => template.columns(),
        };
        log::info!("sheet {}: opened with {} rows", id, rows.len());
        Ok(Self::new(id, rows, columns, settings))
    }

    /// Write the keys changed since the last save. Returns whether anything
    /// was written.
    pub fn save(&mut self, store: &dyn KeyValueStore) -> Result<bool, AppError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        if self.rows_dirty {
            let data = serde_json::to_string(self.rows.rows())?;
            store.set(&storage::data_key(&self.id), &data)?;
            self.rows_dirty = false;
        }
        if self.columns_dirty {
            let data = serde_json::to_string(&self.columns)?;
            store.set(&storage::columns_key(&self.id), &data)?;
            self.columns_dirty = false;
        }
        log::debug!("sheet {}: saved", self.id);
        Ok(true)
    }

    pub fn is_dirty(&self) -> bool {
        self.rows_dirty || self.columns_dirty
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rows(&self) -> &RowCollection {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn view(&self) -> &ViewPipeline {
        &self.view
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    // ========================================================================
    // Displayed rows
    // ========================================================================

    pub fn display_ids(&mut self) -> &[RowId] {
        self.view.display_ids(&self.rows)
    }

    pub fn display_rows(&mut self) -> Vec<&Row> {
        self.view.display_rows(&self.rows)
    }

    /// Rebuild the grid's row space from the current view.
    fn refresh(&mut self) {
        let ids = self.view.display_ids(&self.rows).to_vec();
        let space = RowSpace::new(ids, self.rows.max_id(), self.padding);
        self.grid.set_rows(space);
    }

    // ========================================================================
    // Grid interaction
    // ========================================================================

    pub fn click(&mut self, coord: CellCoord) -> bool {
        self.grid.select(coord)
    }

    pub fn handle_key(&mut self, key: NavKey) -> bool {
        self.grid.handle_key(key)
    }

    pub fn begin_edit(&mut self, anchor: AnchorRect) -> Result<(), AppError> {
        Ok(self.grid.begin_edit(&self.rows, anchor)?)
    }

    pub fn begin_edit_at(&mut self, coord: CellCoord, anchor: AnchorRect) -> Result<(), AppError> {
        Ok(self.grid.begin_edit_at(&self.rows, coord, anchor)?)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), AppError> {
        Ok(self.grid.set_draft(text)?)
    }

    /// Commit the open editor into the rows.
    ///
    /// A rejected draft leaves the editor open and the rows untouched.
    pub fn commit_edit(&mut self) -> Result<UpsertOutcome, AppError> {
        let commit = self.grid.commit(self.strict_dates)?;
        let row = commit.row;
        let today = self.today();
        let outcome = self.rows.apply_commit(commit, today)?;
        if outcome == UpsertOutcome::Created {
            log::debug!("sheet {}: created row {}", self.id, row);
        }
        self.rows_dirty = true;
        self.refresh();
        Ok(outcome)
    }

    pub fn cancel_edit(&mut self) -> Result<(), AppError> {
        Ok(self.grid.cancel()?)
    }

    // ========================================================================
    // Rows and view state
    // ========================================================================

    /// Append a blank row dated today.
    pub fn add_row(&mut self) -> RowId {
        let today = self.today();
        let id = self.rows.push_blank(today);
        self.rows_dirty = true;
        self.refresh();
        id
    }

    /// Switch category. The selection is dropped.
    pub fn set_category(&mut self, category: Category) {
        self.view.set_category(category);
        self.grid.reset();
        self.refresh();
    }

    pub fn set_filters(&mut self, clauses: &[FilterClause]) {
        self.view.set_clauses(clauses);
        self.refresh();
    }

    /// Header click on `field`. Returns the resulting sort.
    pub fn toggle_sort(&mut self, field: Field) -> Option<SortDirective> {
        let next = SortDirective::cycle(self.view.sort(), field, self.columns.is_sortable(field));
        self.view.set_sort(next);
        self.refresh();
        next
    }

    pub fn set_sort(&mut self, sort: Option<SortDirective>) {
        self.view.set_sort(sort);
        self.refresh();
    }

    /// Back to All, no filters, no sort, no selection.
    pub fn reset_view(&mut self) {
        self.view.reset();
        self.grid.reset();
        self.refresh();
    }

    /// Show or hide a column. Returns the new hidden state, `None` when the
    /// sheet has no such column.
    pub fn toggle_column(&mut self, field: Field) -> Option<bool> {
        let hidden = self.columns.toggle_visibility(field)?;
        self.columns_dirty = true;
        self.grid.set_columns(self.columns.visible_fields());
        Some(hidden)
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Replace every row with the file's records. On any error the rows are
    /// left as they were.
    pub fn import(&mut self, input: &FileInput) -> Result<usize, AppError> {
        let rows = tasksheet_io::import(input, self.delimiter)?;
        let count = rows.len();
        self.rows.replace_all(rows)?;
        self.grid.reset();
        self.rows_dirty = true;
        self.refresh();
        log::info!("sheet {}: imported {} rows from {}", self.id, count, input.name);
        Ok(count)
    }

    /// Displayed rows as delimited text, every field included.
    pub fn export_csv(&mut self) -> Result<ExportFile, AppError> {
        let delimiter = match self.delimiter {
            Delimiter::Byte(b) => b,
            Delimiter::Auto => b',',
        };
        let filename = csv::export_filename(&self.export_prefix, self.today());
        let rows = self.view.display_rows(&self.rows);
        if rows.is_empty() {
            return Err(AppError::NothingToExport);
        }
        let payload = csv::export_rows(rows.iter().copied(), delimiter)?;
        log::info!("sheet {}: exported {} rows to {}", self.id, rows.len(), filename);
        Ok(ExportFile { filename, payload })
    }

    /// Displayed rows as a JSON array, ids included.
    pub fn export_json(&mut self) -> Result<ExportFile, AppError> {
        let filename = format!("{}-{}.json", self.export_prefix, self.today().format("%Y-%m-%d"));
        let rows = self.view.display_rows(&self.rows);
        if rows.is_empty() {
            return Err(AppError::NothingToExport);
        }
        let payload = json::export_rows(rows.iter().copied())?;
        log::info!("sheet {}: exported {} rows to {}", self.id, rows.len(), filename);
        Ok(ExportFile { filename, payload })
    }

    /// What the user sees: displayed rows, filters, sort and visible columns.
    /// There is nothing to share without displayed rows.
    pub fn share_payload(&mut self) -> Result<ExportFile, AppError> {
        let data: Vec<Row> = self
            .view
            .display_rows(&self.rows)
            .into_iter()
            .cloned()
            .collect();
        if data.is_empty() {
            return Err(AppError::NothingToExport);
        }
        let share = SharePayload {
            data,
            filters: self.view.clauses().to_vec(),
            sort_config: self.view.sort(),
            columns: self.columns.visible().cloned().collect(),
        };
        Ok(ExportFile {
            filename: SHARE_FILENAME.to_string(),
            payload: share.to_json()?,
        })
    }
}

fn parse_rows(data: &str) -> Result<RowCollection, AppError> {
    let rows = json::import_rows(data)?;
    Ok(RowCollection::from_rows(rows)?)
}
