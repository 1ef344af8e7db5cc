//! In-memory month-keyed budget collaborator.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::csv_io;
use crate::domain::{Budget, MonthKey};
use crate::errors::Result;

/// Owns one budget per calendar month. Like [`super::ExpenseBook`],
/// budgets live only for the session or travel through CSV.
#[derive(Debug, Default)]
pub struct BudgetBook {
    budgets: BTreeMap<MonthKey, Budget>,
}

impl BudgetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cap for a month, resetting any tracked spending.
    pub fn set_budget(&mut self, month: MonthKey, amount: f64) {
        self.budgets.insert(month, Budget::new(month, amount));
    }

    /// Changes the cap while preserving tracked spending. Returns false
    /// when no budget exists for the month.
    pub fn update_budget(&mut self, month: MonthKey, amount: f64) -> bool {
        match self.budgets.get_mut(&month) {
            Some(budget) => {
                budget.budget_amount = amount;
                budget.remaining = amount - budget.spent;
                true
            }
            None => false,
        }
    }

    /// Records spending against a month's budget, if one exists.
    pub fn record_spending(&mut self, month: MonthKey, amount: f64) -> bool {
        match self.budgets.get_mut(&month) {
            Some(budget) => {
                budget.spent += amount;
                budget.remaining = budget.budget_amount - budget.spent;
                true
            }
            None => false,
        }
    }

    /// Deletes a month's budget; unknown months are ignored.
    pub fn remove_budget(&mut self, month: MonthKey) {
        self.budgets.remove(&month);
    }

    pub fn budget_for_month(&self, month: MonthKey) -> Option<&Budget> {
        self.budgets.get(&month)
    }

    pub fn current_month_budget(&self, today: NaiveDate) -> Option<&Budget> {
        self.budgets.get(&MonthKey::from_date(today))
    }

    /// Budgeted months, most recent first.
    pub fn months(&self) -> Vec<MonthKey> {
        self.budgets.keys().rev().copied().collect()
    }

    /// Snapshot of all budgets for the report helpers.
    pub fn budgets(&self) -> Vec<Budget> {
        self.budgets.values().cloned().collect()
    }

    /// Imports budgets from CSV. An imported month overwrites any
    /// existing budget for that month; a malformed document imports
    /// nothing.
    pub fn import_csv(&mut self, data: &str) -> Result<usize> {
        let imported = csv_io::parse_budgets(data)?;
        let count = imported.len();
        for budget in imported {
            self.budgets.insert(budget.month, budget);
        }
        debug!(count, total = self.budgets.len(), "imported budgets");
        Ok(count)
    }

    pub fn export_csv(&self) -> Result<String> {
        csv_io::render_budgets(&self.budgets())
    }
}
