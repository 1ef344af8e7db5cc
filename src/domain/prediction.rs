use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a predicted transaction adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Outgoing,
}

/// A transaction the prediction walk expects on a given day. Computed on
/// the fly, never persisted. The amount is signed: positive income,
/// negative outgoing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictedTransaction {
    pub name: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub date: NaiveDate,
}

/// One day of the prediction walk. `balance` is the running total after
/// this day's transactions have been applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub balance: f64,
    pub transactions: Vec<PredictedTransaction>,
}

/// Result of projecting the balance forward to a target date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoneyPrediction {
    pub current_balance: f64,
    pub predicted_balance: f64,
    pub target_date: NaiveDate,
    pub daily_breakdown: Vec<DailyBreakdown>,
}
