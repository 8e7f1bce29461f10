//! View Pipeline - raw rows to displayed rows
//!
//! `display = sort(filter(category(raw), clauses), directive)`
//!
//! The category is a coarse status filter chosen by tab; the clauses are the
//! ad-hoc filters. Both must hold. Output is the list of row ids in display
//! order; rows are looked up in the collection by id.
//!
//! The pipeline caches its last output. The cache key is the collection's
//! (instance, revision) plus a generation number bumped by every view-state
//! setter, so any input change invalidates it.

use serde::{Deserialize, Serialize};

use crate::collection::RowCollection;
use crate::filter::{self, FilterClause};
use crate::row::{Row, RowId, Status};
use crate::sort::{self, SortDirective};

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    All,
    /// Status NotStarted
    Pending,
    InProgress,
    Complete,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::All,
        Category::Pending,
        Category::InProgress,
        Category::Complete,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Pending => "pending",
            Category::InProgress => "in-progress",
            Category::Complete => "complete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All Items",
            Category::Pending => "Pending",
            Category::InProgress => "In Progress",
            Category::Complete => "Complete",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Category::All => true,
            Category::Pending => row.status == Status::NotStarted,
            Category::InProgress => row.status == Status::InProgress,
            Category::Complete => row.status == Status::Complete,
        }
    }
}

// =============================================================================
// ViewPipeline
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    instance: u64,
    revision: u64,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ViewPipeline {
    category: Category,
    /// Active clauses only (inert ones dropped on set)
    clauses: Vec<FilterClause>,
    sort: Option<SortDirective>,
    generation: u64,
    cache: Option<(CacheKey, Vec<RowId>)>,
}

impl ViewPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn sort(&self) -> Option<SortDirective> {
        self.sort
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.invalidate();
    }

    /// Replace the ad-hoc filters. Inert clauses are dropped here.
    pub fn set_clauses(&mut self, clauses: &[FilterClause]) {
        self.clauses = filter::active_clauses(clauses);
        self.invalidate();
    }

    pub fn set_sort(&mut self, sort: Option<SortDirective>) {
        self.sort = sort;
        self.invalidate();
    }

    /// Back to All / no filters / no sort.
    pub fn reset(&mut self) {
        self.category = Category::All;
        self.clauses.clear();
        self.sort = None;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.cache = None;
    }

    /// Run the full pipeline. Pure: same inputs, same output.
    pub fn compute<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        let by_category = rows.iter().filter(|r| self.category.matches(r));
        let filtered = filter::apply_filters(by_category, &self.clauses);
        sort::apply_sort(filtered, self.sort.as_ref())
    }

    /// Displayed row ids, cached until the rows or the view state change.
    pub fn display_ids(&mut self, rows: &RowCollection) -> &[RowId] {
        let key = CacheKey {
            instance: rows.instance(),
            revision: rows.revision(),
            generation: self.generation,
        };
        let stale = !matches!(&self.cache, Some((k, _)) if *k == key);
        if stale {
            let ids = self.compute(rows.rows()).iter().map(|r| r.id).collect();
            self.cache = Some((key, ids));
        }
        match &self.cache {
            Some((_, ids)) => ids,
            None => &[],
        }
    }

    /// Displayed rows, in order.
    pub fn display_rows<'a>(&mut self, rows: &'a RowCollection) -> Vec<&'a Row> {
        self.display_ids(rows)
            .iter()
            .filter_map(|&id| rows.get(id))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
