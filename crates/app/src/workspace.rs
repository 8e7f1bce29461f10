//! Workspace: the store, the sheet catalog and at most one open sheet.
//!
//! Every sheet operation goes through [`Workspace::with_sheet`], which saves
//! the keys the operation changed and refreshes the catalog entry.

use chrono::Utc;

use tasksheet_config::{KeyValueStore, Settings};
use tasksheet_engine::Template;

use crate::catalog::{SheetCatalog, SheetMeta};
use crate::error::AppError;
use crate::sheet::SheetContext;

pub struct Workspace<S: KeyValueStore> {
    store: S,
    settings: Settings,
    catalog: SheetCatalog,
    active: Option<SheetContext>,
}

impl<S: KeyValueStore> Workspace<S> {
    pub fn open(store: S, settings: Settings) -> Result<Self, AppError> {
        let catalog = SheetCatalog::load(&store)?;
        log::info!("workspace: {} sheets", catalog.len());
        Ok(Self {
            store,
            settings,
            catalog,
            active: None,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &SheetCatalog {
        &self.catalog
    }

    pub fn search(&self, term: &str) -> Vec<&SheetMeta> {
        self.catalog.search(term)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub fn create_sheet(
        &mut self,
        name: &str,
        description: &str,
        template: Template,
    ) -> Result<SheetMeta, AppError> {
        self.catalog.create_sheet(
            &self.store,
            name,
            description,
            template,
            &self.settings.display_name,
            Utc::now(),
        )
    }

    pub fn duplicate_sheet(&mut self, id: &str) -> Result<SheetMeta, AppError> {
        self.catalog
            .duplicate_sheet(&self.store, id, &self.settings.display_name, Utc::now())
    }

    /// Delete a sheet. Deleting the open sheet closes it without saving.
    pub fn delete_sheet(&mut self, id: &str) -> Result<SheetMeta, AppError> {
        let meta = self.catalog.delete_sheet(&self.store, id)?;
        if self.active.as_ref().is_some_and(|s| s.id() == id) {
            self.active = None;
        }
        Ok(meta)
    }

    // ========================================================================
    // Open sheet
    // ========================================================================

    /// Open a sheet, closing the current one. Category, filters, sort and
    /// selection start fresh. If the current sheet fails to save it stays
    /// open and the error is returned.
    ///
    /// Changes go through [`Workspace::with_sheet`] so they are saved.
    pub fn open_sheet(&mut self, id: &str) -> Result<&SheetContext, AppError> {
        let template = self
            .catalog
            .get(id)
            .map(|meta| meta.template)
            .ok_or_else(|| AppError::UnknownSheet(id.to_string()))?;
        self.close_sheet()?;
        let ctx = SheetContext::load(&self.store, id, template, &self.settings)?;
        Ok(self.active.insert(ctx))
    }

    /// Close the open sheet, saving anything pending. The sheet stays open
    /// when the save fails.
    pub fn close_sheet(&mut self) -> Result<(), AppError> {
        if let Some(ctx) = self.active.as_mut() {
            persist(&self.store, &mut self.catalog, ctx)?;
        }
        if let Some(ctx) = self.active.take() {
            log::info!("sheet {}: closed", ctx.id());
        }
        Ok(())
    }

    pub fn active(&self) -> Option<&SheetContext> {
        self.active.as_ref()
    }

    /// Run `f` on the open sheet, then save what it changed.
    ///
    /// The save runs even when `f` fails; a failed operation leaves nothing
    /// dirty, so nothing is written.
    pub fn with_sheet<R>(
        &mut self,
        f: impl FnOnce(&mut SheetContext) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let ctx = self.active.as_mut().ok_or(AppError::NoSheetOpen)?;
        let result = f(ctx);
        persist(&self.store, &mut self.catalog, ctx)?;
        result
    }
}

/// Save a sheet's dirty keys and refresh its catalog entry.
///
/// A sheet the catalog no longer lists is never written.
pub(crate) fn persist(
    store: &dyn KeyValueStore,
    catalog: &mut SheetCatalog,
    ctx: &mut SheetContext,
) -> Result<(), AppError> {
    if !catalog.contains(ctx.id()) {
        log::warn!("sheet {}: deleted, changes dropped", ctx.id());
        return Err(AppError::UnknownSheet(ctx.id().to_string()));
    }
    if ctx.save(store)? {
        catalog.record_save(store, ctx.id(), ctx.rows().len(), Utc::now())?;
    }
    Ok(())
}
