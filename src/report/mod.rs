//! Aggregation helpers deriving chart and summary data from expense
//! and budget snapshots. Everything here is pure: callers pass slices,
//! nothing is persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Budget, Expense, MonthKey};

/// Sort direction for expense listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One slice of the spending pie: a category and its total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub total: f64,
}

/// One bar of the month-by-month spending chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBar {
    pub month: MonthKey,
    pub total: f64,
}

/// Budget-versus-spending row for one month. `remaining` is clamped at
/// zero so overspending reads as an exhausted budget, not a credit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverviewRow {
    pub month: MonthKey,
    pub budget_amount: Option<f64>,
    pub spent: f64,
    pub remaining: Option<f64>,
}

/// Full month summary with its expenses embedded. Unlike
/// [`BudgetOverviewRow`], `remaining` is left unclamped so callers can
/// show how far over budget a month went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub month: MonthKey,
    pub total_spent: f64,
    pub budget_amount: Option<f64>,
    pub remaining: Option<f64>,
    pub expenses: Vec<Expense>,
}

/// Total spend per month, keyed ascending.
pub fn monthly_totals(expenses: &[Expense]) -> BTreeMap<MonthKey, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals.entry(MonthKey::from_date(expense.date)).or_insert(0.0) += expense.amount;
    }
    totals
}

/// Total spend per category. With a filter only that category appears.
pub fn category_totals(expenses: &[Expense], category: Option<&str>) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        if category.is_some_and(|wanted| wanted != expense.category) {
            continue;
        }
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}

/// Category totals ordered biggest slice first.
pub fn pie_chart_data(expenses: &[Expense]) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = category_totals(expenses, None)
        .into_iter()
        .map(|(category, total)| CategorySlice { category, total })
        .collect();
    slices.sort_by(|a, b| b.total.total_cmp(&a.total));
    slices
}

/// Monthly totals in ascending month order.
pub fn bar_chart_data(expenses: &[Expense]) -> Vec<MonthBar> {
    monthly_totals(expenses)
        .into_iter()
        .map(|(month, total)| MonthBar { month, total })
        .collect()
}

/// Budget-versus-spending rows over the union of months that have a
/// budget or any spending, ascending.
pub fn budget_overview(expenses: &[Expense], budgets: &[Budget]) -> Vec<BudgetOverviewRow> {
    let spending = monthly_totals(expenses);
    let mut months: BTreeMap<MonthKey, Option<f64>> =
        spending.keys().map(|month| (*month, None)).collect();
    for budget in budgets {
        months.insert(budget.month, Some(budget.budget_amount));
    }

    months
        .into_iter()
        .map(|(month, budget_amount)| {
            let spent = spending.get(&month).copied().unwrap_or(0.0);
            let remaining = budget_amount.map(|amount| (amount - spent).max(0.0));
            BudgetOverviewRow {
                month,
                budget_amount,
                spent,
                remaining,
            }
        })
        .collect()
}

/// Month summaries with embedded expenses, most recent month first.
pub fn monthly_data(expenses: &[Expense], budgets: &[Budget]) -> Vec<MonthlyReport> {
    let mut months: BTreeMap<MonthKey, Vec<Expense>> = BTreeMap::new();
    for expense in expenses {
        months
            .entry(MonthKey::from_date(expense.date))
            .or_default()
            .push(expense.clone());
    }
    for budget in budgets {
        months.entry(budget.month).or_default();
    }

    months
        .into_iter()
        .rev()
        .map(|(month, expenses)| report_for(month, expenses, budgets))
        .collect()
}

/// Summary for the month containing `today`, even when nothing has been
/// spent or budgeted yet.
pub fn current_month_data(expenses: &[Expense], budgets: &[Budget], today: NaiveDate) -> MonthlyReport {
    let month = MonthKey::from_date(today);
    let in_month = expenses
        .iter()
        .filter(|expense| month.contains(expense.date))
        .cloned()
        .collect();
    report_for(month, in_month, budgets)
}

fn report_for(month: MonthKey, expenses: Vec<Expense>, budgets: &[Budget]) -> MonthlyReport {
    let total_spent: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let budget_amount = budgets
        .iter()
        .find(|budget| budget.month == month)
        .map(|budget| budget.budget_amount);
    MonthlyReport {
        month,
        total_spent,
        budget_amount,
        remaining: budget_amount.map(|amount| amount - total_spent),
        expenses,
    }
}

/// Returns a sorted copy. A price order takes precedence over a date
/// order; with neither, the listing falls back to newest-first.
pub fn sort_expenses(
    expenses: &[Expense],
    date_order: Option<SortOrder>,
    price_order: Option<SortOrder>,
) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    match (price_order, date_order) {
        (Some(order), _) => sorted.sort_by(|a, b| {
            let cmp = a.amount.total_cmp(&b.amount);
            match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        }),
        (None, Some(order)) => sorted.sort_by(|a, b| {
            let cmp = a.date.cmp(&b.date);
            match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        }),
        (None, None) => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
    }
    sorted
}
