//! Shared sheet access for multi-threaded hosts.
//!
//! Each open sheet sits behind its own mutex, so at most one operation per
//! sheet is in flight while different sheets proceed in parallel. The catalog
//! has a mutex of its own.
//!
//! Lock order: `sheets` before `catalog`, and a sheet's mutex before
//! `catalog`. Nothing takes `sheets` while holding a sheet's mutex.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use tasksheet_config::{KeyValueStore, Settings};
use tasksheet_engine::Template;

use crate::catalog::{SheetCatalog, SheetMeta};
use crate::error::AppError;
use crate::sheet::SheetContext;
use crate::workspace::persist;

pub type SharedSheet = Arc<Mutex<SheetContext>>;

pub struct SheetService {
    store: Arc<dyn KeyValueStore>,
    settings: Settings,
    catalog: Mutex<SheetCatalog>,
    sheets: Mutex<FxHashMap<String, SharedSheet>>,
}

impl SheetService {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: Settings) -> Result<Self, AppError> {
        let catalog = SheetCatalog::load(&*store)?;
        Ok(Self {
            store,
            settings,
            catalog: Mutex::new(catalog),
            sheets: Mutex::new(FxHashMap::default()),
        })
    }

    /// Snapshot of the catalog.
    pub fn list(&self) -> Vec<SheetMeta> {
        self.catalog.lock().iter().cloned().collect()
    }

    pub fn search(&self, term: &str) -> Vec<SheetMeta> {
        self.catalog.lock().search(term).into_iter().cloned().collect()
    }

    pub fn create_sheet(
        &self,
        name: &str,
        description: &str,
        template: Template,
    ) -> Result<SheetMeta, AppError> {
        self.catalog.lock().create_sheet(
            &*self.store,
            name,
            description,
            template,
            &self.settings.display_name,
            Utc::now(),
        )
    }

    pub fn duplicate_sheet(&self, id: &str) -> Result<SheetMeta, AppError> {
        // Flush pending edits of the source first
        let loaded = self.sheets.lock().get(id).cloned();
        if let Some(sheet) = loaded {
            let mut ctx = sheet.lock();
            persist(&*self.store, &mut *self.catalog.lock(), &mut *ctx)?;
        }
        self.catalog
            .lock()
            .duplicate_sheet(&*self.store, id, &self.settings.display_name, Utc::now())
    }

    /// Delete a sheet. An operation already running on it finishes, but its
    /// changes are dropped and it returns [`AppError::UnknownSheet`].
    pub fn delete_sheet(&self, id: &str) -> Result<SheetMeta, AppError> {
        self.evict(id);
        self.catalog.lock().delete_sheet(&*self.store, id)
    }

    /// The shared context for `id`, loading it on first use.
    pub fn sheet(&self, id: &str) -> Result<SharedSheet, AppError> {
        let mut sheets = self.sheets.lock();
        if let Some(sheet) = sheets.get(id) {
            return Ok(Arc::clone(sheet));
        }
        let template = self
            .catalog
            .lock()
            .get(id)
            .map(|meta| meta.template)
            .ok_or_else(|| AppError::UnknownSheet(id.to_string()))?;
        let ctx = SheetContext::load(&*self.store, id, template, &self.settings)?;
        let sheet = Arc::new(Mutex::new(ctx));
        sheets.insert(id.to_string(), Arc::clone(&sheet));
        Ok(sheet)
    }

    /// Run `f` with the sheet locked, then save what it changed.
    pub fn with_sheet<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut SheetContext) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let sheet = self.sheet(id)?;
        let mut ctx = sheet.lock();
        let result = f(&mut *ctx);
        persist(&*self.store, &mut *self.catalog.lock(), &mut *ctx)?;
        result
    }

    /// Drop a loaded context. Pending changes are not saved.
    pub fn evict(&self, id: &str) -> bool {
        self.sheets.lock().remove(id).is_some()
    }

    pub fn loaded(&self) -> usize {
        self.sheets.lock().len()
    }
}
