use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::frequency::MonthKey;

/// An already-recorded spend, supplied by the expense-tracking
/// collaborator. Only future-dated expenses participate in predictions;
/// past spending is assumed to be reflected in the current balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Expense {
    pub fn new(
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category: category.into(),
            date,
            note,
        }
    }
}

/// A spending cap for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub month: MonthKey,
    pub budget_amount: f64,
    pub spent: f64,
    pub remaining: f64,
}

impl Budget {
    pub fn new(month: MonthKey, budget_amount: f64) -> Self {
        Self {
            month,
            budget_amount,
            spent: 0.0,
            remaining: budget_amount,
        }
    }
}
