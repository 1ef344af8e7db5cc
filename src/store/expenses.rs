//! In-memory expense collaborator. Expenses live only for the session
//! (or travel through CSV); nothing here touches the key-value store.

use tracing::debug;
use uuid::Uuid;

use crate::csv_io;
use crate::domain::Expense;
use crate::errors::Result;
use crate::report;

pub use crate::report::SortOrder;

/// Owns the recorded expenses and answers filtered/sorted views over
/// them. Snapshots from [`expenses`](ExpenseBook::expenses) feed the
/// predictor and the report helpers.
#[derive(Debug, Default)]
pub struct ExpenseBook {
    expenses: Vec<Expense>,
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn add(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        id
    }

    /// Replaces the expense with the same id. Returns false and changes
    /// nothing when the id is unknown.
    pub fn update(&mut self, expense: Expense) -> bool {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(slot) => {
                *slot = expense;
                true
            }
            None => false,
        }
    }

    /// Deletes an expense; unknown ids are ignored.
    pub fn remove(&mut self, id: Uuid) {
        self.expenses.retain(|expense| expense.id != id);
    }

    /// Filtered and sorted view. `category: None` means all categories;
    /// ordering follows [`report::sort_expenses`].
    pub fn filtered(
        &self,
        category: Option<&str>,
        date_order: Option<SortOrder>,
        price_order: Option<SortOrder>,
    ) -> Vec<Expense> {
        let selected: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|expense| category.map_or(true, |wanted| expense.category == wanted))
            .cloned()
            .collect();
        report::sort_expenses(&selected, date_order, price_order)
    }

    /// Distinct categories in alphabetical order.
    pub fn unique_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .expenses
            .iter()
            .map(|expense| expense.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Appends every expense from a CSV document. A malformed document
    /// imports nothing.
    pub fn import_csv(&mut self, data: &str) -> Result<usize> {
        let imported = csv_io::parse_expenses(data)?;
        let count = imported.len();
        self.expenses.extend(imported);
        debug!(count, total = self.expenses.len(), "imported expenses");
        Ok(count)
    }

    pub fn export_csv(&self) -> Result<String> {
        csv_io::render_expenses(&self.expenses)
    }
}
