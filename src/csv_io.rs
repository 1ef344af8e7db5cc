//! CSV import/export for expenses and budgets.
//!
//! Expense files carry a `Date,Category,Amount,Note` header, budget
//! files `Month,Budget Amount`. Dates are ISO (`YYYY-MM-DD`), months
//! `YYYY-MM`. Import is strict: a wrong header or an unparseable row
//! aborts the whole file so a partial import never goes unnoticed.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Budget, Expense, MonthKey};
use crate::errors::{CoreError, Result};

const EXPENSE_HEADER: [&str; 4] = ["Date", "Category", "Amount", "Note"];
const BUDGET_HEADER: [&str; 2] = ["Month", "Budget Amount"];

/// Parses an expense CSV document. Fresh ids are assigned on import.
pub fn parse_expenses(data: &str) -> Result<Vec<Expense>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());
    check_header(reader.headers()?, &EXPENSE_HEADER)?;

    let mut expenses = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        let date = field(&record, 0, line, "date")?;
        let date: NaiveDate = date
            .parse()
            .map_err(|_| bad_row(line, format!("invalid date `{date}`")))?;
        let category = field(&record, 1, line, "category")?.to_string();
        let amount = field(&record, 2, line, "amount")?;
        let amount: f64 = amount
            .parse()
            .map_err(|_| bad_row(line, format!("invalid amount `{amount}`")))?;
        let note = match record.get(3).map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(text.to_string()),
        };
        expenses.push(Expense::new(amount, category, date, note));
    }
    debug!(count = expenses.len(), "parsed expense CSV");
    Ok(expenses)
}

/// Renders expenses back into the import format.
pub fn render_expenses(expenses: &[Expense]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPENSE_HEADER)?;
    for expense in expenses {
        writer.write_record([
            expense.date.to_string().as_str(),
            expense.category.as_str(),
            expense.amount.to_string().as_str(),
            expense.note.as_deref().unwrap_or(""),
        ])?;
    }
    finish(writer)
}

/// Parses a budget CSV document into month-keyed budgets with no
/// spending recorded against them yet.
pub fn parse_budgets(data: &str) -> Result<Vec<Budget>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());
    check_header(reader.headers()?, &BUDGET_HEADER)?;

    let mut budgets = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        let month = field(&record, 0, line, "month")?;
        let month: MonthKey = month
            .parse()
            .map_err(|_| bad_row(line, format!("invalid month `{month}`")))?;
        let amount = field(&record, 1, line, "budget amount")?;
        let amount: f64 = amount
            .parse()
            .map_err(|_| bad_row(line, format!("invalid budget amount `{amount}`")))?;
        budgets.push(Budget::new(month, amount));
    }
    debug!(count = budgets.len(), "parsed budget CSV");
    Ok(budgets)
}

/// Renders budgets back into the import format.
pub fn render_budgets(budgets: &[Budget]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(BUDGET_HEADER)?;
    for budget in budgets {
        writer.write_record([
            budget.month.to_string().as_str(),
            budget.budget_amount.to_string().as_str(),
        ])?;
    }
    finish(writer)
}

fn check_header(actual: &csv::StringRecord, expected: &[&str]) -> Result<()> {
    let matches = actual.len() >= expected.len()
        && expected
            .iter()
            .zip(actual.iter())
            .all(|(want, got)| got.trim().eq_ignore_ascii_case(want));
    if matches {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "invalid CSV header, expected `{}`",
            expected.join(",")
        )))
    }
}

fn field<'r>(record: &'r csv::StringRecord, index: usize, line: usize, name: &str) -> Result<&'r str> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| bad_row(line, format!("missing {name}")))
}

fn bad_row(line: usize, detail: String) -> CoreError {
    CoreError::InvalidInput(format!("CSV line {line}: {detail}"))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|err| CoreError::Storage(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| CoreError::Storage(err.to_string()))
}
