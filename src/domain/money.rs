use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::frequency::ItemFrequency;

/// A one-off or indefinitely recurring income source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeItem {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    /// Date of the one-off payment, or the recurrence anchor.
    pub date: NaiveDate,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<ItemFrequency>,
}

impl IncomeItem {
    pub fn one_off(name: impl Into<String>, amount: f64, date: NaiveDate) -> NewIncomeItem {
        NewIncomeItem {
            name: name.into(),
            amount,
            date,
            is_recurring: false,
            frequency: None,
        }
    }

    pub fn recurring(
        name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        frequency: ItemFrequency,
    ) -> NewIncomeItem {
        NewIncomeItem {
            name: name.into(),
            amount,
            date,
            is_recurring: true,
            frequency: Some(frequency),
        }
    }
}

/// Draft for creating an income item; the predictor assigns the id.
#[derive(Debug, Clone)]
pub struct NewIncomeItem {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub frequency: Option<ItemFrequency>,
}

/// A one-off or indefinitely recurring outgoing commitment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutgoingItem {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<ItemFrequency>,
}

impl OutgoingItem {
    pub fn one_off(
        name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> NewOutgoingItem {
        NewOutgoingItem {
            name: name.into(),
            amount,
            date,
            category: category.into(),
            is_recurring: false,
            frequency: None,
        }
    }

    pub fn recurring(
        name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
        frequency: ItemFrequency,
    ) -> NewOutgoingItem {
        NewOutgoingItem {
            name: name.into(),
            amount,
            date,
            category: category.into(),
            is_recurring: true,
            frequency: Some(frequency),
        }
    }
}

/// Draft for creating an outgoing item; the predictor assigns the id.
#[derive(Debug, Clone)]
pub struct NewOutgoingItem {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub is_recurring: bool,
    pub frequency: Option<ItemFrequency>,
}
