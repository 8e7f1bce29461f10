//! Built-in sheet templates. A template only decides the column set;
//! every new sheet starts with no rows.

use serde::{Deserialize, Serialize};

use crate::column::{ColumnDescriptor, ColumnSet};
use crate::row::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    #[default]
    Blank,
    ProjectTracker,
    BudgetPlanner,
    Inventory,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::Blank,
        Template::ProjectTracker,
        Template::BudgetPlanner,
        Template::Inventory,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Template::Blank => "blank",
            Template::ProjectTracker => "project-tracker",
            Template::BudgetPlanner => "budget-planner",
            Template::Inventory => "inventory",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Template::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Template::Blank => "Blank Spreadsheet",
            Template::ProjectTracker => "Project Tracker",
            Template::BudgetPlanner => "Budget Planner",
            Template::Inventory => "Inventory Management",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Blank => "Start with an empty spreadsheet",
            Template::ProjectTracker => "Track project tasks and progress",
            Template::BudgetPlanner => "Manage finances and expenses",
            Template::Inventory => "Track products and stock levels",
        }
    }

    pub fn columns(&self) -> ColumnSet {
        let col = ColumnDescriptor::new;
        let columns = match self {
            Template::Blank => vec![
                col(Field::JobRequest, "Job Request", 80, true),
                col(Field::Submitted, "Submitted", 32, true),
                col(Field::Status, "Status", 36, true),
                col(Field::Submitter, "Submitter", 36, true),
                col(Field::Url, "URL", 40, false),
                col(Field::Assigned, "Assigned", 36, true),
                col(Field::Priority, "Priority", 28, true),
                col(Field::DueDate, "Due Date", 32, true),
                col(Field::EstValue, "Est. Value", 32, true),
            ],
            Template::ProjectTracker => vec![
                col(Field::JobRequest, "Task Name", 80, true),
                col(Field::Submitted, "Start Date", 32, true),
                col(Field::Status, "Status", 36, true),
                col(Field::Submitter, "Assignee", 36, true),
                col(Field::Priority, "Priority", 28, true),
                col(Field::DueDate, "Due Date", 32, true),
                col(Field::EstValue, "Budget", 32, true),
            ],
            Template::BudgetPlanner => vec![
                col(Field::JobRequest, "Expense Item", 80, true),
                col(Field::Submitted, "Date", 32, true),
                col(Field::Status, "Category", 36, true),
                col(Field::Submitter, "Vendor", 36, true),
                col(Field::Priority, "Type", 28, true),
                col(Field::EstValue, "Amount", 32, true),
            ],
            Template::Inventory => vec![
                col(Field::JobRequest, "Product Name", 80, true),
                col(Field::Submitted, "Last Updated", 32, true),
                col(Field::Status, "Status", 36, true),
                col(Field::Submitter, "Supplier", 36, true),
                col(Field::Priority, "Category", 28, true),
                col(Field::EstValue, "Unit Price", 32, true),
            ],
        };
        ColumnSet::from_builtin(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_build_valid_columns() {
        for t in Template::ALL {
            let cols = t.columns();
            assert!(ColumnSet::new(cols.iter().cloned().collect()).is_ok(), "{}", t.id());
            assert_eq!(Template::from_id(t.id()), Some(t));
        }
    }

    #[test]
    fn test_template_labels() {
        let cols = Template::BudgetPlanner.columns();
        assert_eq!(cols.len(), 6);
        assert_eq!(cols.get(Field::EstValue).unwrap().label, "Amount");
        assert!(cols.get(Field::Url).is_none());
    }
}
