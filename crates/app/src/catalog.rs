//! Sheet catalog: the list of named sheets kept under `sheet-catalog`.
//!
//! Catalog operations that create or remove sheets also write or remove the
//! sheet's own keys (`sheet-data-{id}`, `sheet-columns-{id}`), so the store
//! never holds a sheet the catalog does not list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tasksheet_config::storage::{self, KeyValueStore};
use tasksheet_engine::Template;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub template: Template,
}

impl SheetMeta {
    /// Case-insensitive substring match on name or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

/// A fresh sheet id, safe to embed in storage keys.
pub fn new_sheet_id() -> String {
    format!("sheet-{}", uuid::Uuid::new_v4().simple())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetCatalog {
    sheets: Vec<SheetMeta>,
}

impl SheetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the catalog. Missing means empty; an unreadable value is logged
    /// and treated as empty.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, AppError> {
        let Some(json) = store.get(storage::CATALOG_KEY)? else {
            return Ok(Self::new());
        };
        match serde_json::from_str::<Vec<SheetMeta>>(&json) {
            Ok(sheets) => Ok(Self { sheets }),
            Err(e) => {
                log::warn!("catalog: stored catalog is unreadable ({}), starting empty", e);
                Ok(Self::new())
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), AppError> {
        let json = serde_json::to_string(&self.sheets)?;
        store.set(storage::CATALOG_KEY, &json)?;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SheetMeta> {
        self.sheets.iter()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SheetMeta> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn search(&self, term: &str) -> Vec<&SheetMeta> {
        self.sheets.iter().filter(|s| s.matches(term)).collect()
    }

    // ========================================================================
    // Store-backed operations
    // ========================================================================

    /// Add a sheet with no rows and its template's columns.
    pub fn create_sheet(
        &mut self,
        store: &dyn KeyValueStore,
        name: &str,
        description: &str,
        template: Template,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<SheetMeta, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidName);
        }
        let meta = SheetMeta {
            id: new_sheet_id(),
            name: name.to_string(),
            description: description.trim().to_string(),
            last_modified: now,
            row_count: 0,
            created_by: created_by.to_string(),
            template,
        };

        store.set(&storage::data_key(&meta.id), "[]")?;
        let columns = serde_json::to_string(&template.columns())?;
        store.set(&storage::columns_key(&meta.id), &columns)?;

        self.sheets.push(meta.clone());
        self.save(store)?;
        log::info!("catalog: created '{}' ({}) from {}", meta.name, meta.id, template.id());
        Ok(meta)
    }

    /// Copy a sheet's metadata and stored keys under a new id. The copy is
    /// named `<name> (Copy)`.
    pub fn duplicate_sheet(
        &mut self,
        store: &dyn KeyValueStore,
        id: &str,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<SheetMeta, AppError> {
        let source = self
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::UnknownSheet(id.to_string()))?;
        let copy = SheetMeta {
            id: new_sheet_id(),
            name: format!("{} (Copy)", source.name),
            last_modified: now,
            created_by: created_by.to_string(),
            ..source
        };

        if let Some(data) = store.get(&storage::data_key(id))? {
            store.set(&storage::data_key(&copy.id), &data)?;
        }
        if let Some(columns) = store.get(&storage::columns_key(id))? {
            store.set(&storage::columns_key(&copy.id), &columns)?;
        }

        self.sheets.push(copy.clone());
        self.save(store)?;
        log::info!("catalog: duplicated {} as {}", id, copy.id);
        Ok(copy)
    }

    /// Remove a sheet and both of its keys.
    pub fn delete_sheet(&mut self, store: &dyn KeyValueStore, id: &str) -> Result<SheetMeta, AppError> {
        let pos = self
            .sheets
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AppError::UnknownSheet(id.to_string()))?;

        store.remove(&storage::data_key(id))?;
        store.remove(&storage::columns_key(id))?;
        let meta = self.sheets.remove(pos);
        self.save(store)?;
        log::info!("catalog: deleted '{}' ({})", meta.name, id);
        Ok(meta)
    }

    /// Refresh row count and timestamp after a sheet was saved.
    pub fn record_save(
        &mut self,
        store: &dyn KeyValueStore,
        id: &str,
        row_count: usize,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let Some(meta) = self.sheets.iter_mut().find(|s| s.id == id) else {
            return Err(AppError::UnknownSheet(id.to_string()));
        };
        meta.row_count = row_count;
        meta.last_modified = now;
        self.save(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tasksheet_config::MemoryStore;
    use tasksheet_engine::ColumnSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_create_writes_keys() {
        let store = MemoryStore::new();
        let mut catalog = SheetCatalog::new();
        let meta = catalog
            .create_sheet(&store, "  Q3 Budget ", "spend", Template::BudgetPlanner, "Ana", now())
            .unwrap();
        assert_eq!(meta.name, "Q3 Budget");
        assert_eq!(meta.row_count, 0);
        assert!(meta.id.starts_with("sheet-"));

        assert_eq!(store.get(&storage::data_key(&meta.id)).unwrap().as_deref(), Some("[]"));
        let columns: ColumnSet =
            serde_json::from_str(&store.get(&storage::columns_key(&meta.id)).unwrap().unwrap())
                .unwrap();
        assert_eq!(columns, Template::BudgetPlanner.columns());

        // Catalog persisted
        assert_eq!(SheetCatalog::load(&store).unwrap(), catalog);
    }

    #[test]
    fn test_blank_name_rejected() {
        let store = MemoryStore::new();
        let mut catalog = SheetCatalog::new();
        let err = catalog.create_sheet(&store, "   ", "", Template::Blank, "Ana", now());
        assert_eq!(err.unwrap_err(), AppError::InvalidName);
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_copies_keys() {
        let store = MemoryStore::new();
        let mut catalog = SheetCatalog::new();
        let original = catalog
            .create_sheet(&store, "Tasks", "", Template::Blank, "Ana", now())
            .unwrap();
        store.set(&storage::data_key(&original.id), r#"[{"id":1}]"#).unwrap();

        let copy = catalog.duplicate_sheet(&store, &original.id, "Bo", now()).unwrap();
        assert_eq!(copy.name, "Tasks (Copy)");
        assert_eq!(copy.created_by, "Bo");
        assert_ne!(copy.id, original.id);
        assert_eq!(
            store.get(&storage::data_key(&copy.id)).unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_delete_removes_keys() {
        let store = MemoryStore::new();
        let mut catalog = SheetCatalog::new();
        let meta = catalog
            .create_sheet(&store, "Tasks", "", Template::Blank, "Ana", now())
            .unwrap();
        catalog.delete_sheet(&store, &meta.id).unwrap();
        assert!(catalog.is_empty());
        assert!(!store.contains(&storage::data_key(&meta.id)));
        assert!(!store.contains(&storage::columns_key(&meta.id)));
        assert!(matches!(
            catalog.delete_sheet(&store, &meta.id),
            Err(AppError::UnknownSheet(_))
        ));
    }

    #[test]
    fn test_search_name_or_description() {
        let store = MemoryStore::new();
        let mut catalog = SheetCatalog::new();
        catalog
            .create_sheet(&store, "Inventory", "Warehouse stock", Template::Inventory, "Ana", now())
            .unwrap();
        catalog
            .create_sheet(&store, "Roadmap", "Q3 projects", Template::ProjectTracker, "Ana", now())
            .unwrap();
        assert_eq!(catalog.search("STOCK").len(), 1);
        assert_eq!(catalog.search("q3")[0].name, "Roadmap");
        assert_eq!(catalog.search("").len(), 2);
        assert!(catalog.search("payroll").is_empty());
    }

    #[test]
    fn test_corrupt_catalog_loads_empty() {
        let store = MemoryStore::new();
        store.set(storage::CATALOG_KEY, "{broken").unwrap();
        assert!(SheetCatalog::load(&store).unwrap().is_empty());
    }
}
