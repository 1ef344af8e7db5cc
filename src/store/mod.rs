//! Stateful stores owning the persisted collections, each constructed
//! once with an injected persistence port. Cross-store reads happen by
//! passing snapshots into the consuming call, never by shared references.

pub mod budgets;
pub mod expenses;
pub mod predictor;
pub mod recurring;

pub use budgets::BudgetBook;
pub use expenses::{ExpenseBook, SortOrder};
pub use predictor::MoneyPredictor;
pub use recurring::RecurringStore;
