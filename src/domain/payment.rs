use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::frequency::Frequency;

/// A single dated occurrence of a recurring payment. Never persisted on
/// its own: either derived from a regular payment's cadence or owned by
/// the payment's custom schedule, keyed by (payment id, date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentScheduleItem {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    pub processed: bool,
}

/// A recurring payment definition. Regular frequencies derive their
/// occurrences from `start_date`, bounded by `end_date` and
/// `payment_count`; the custom frequency uses `custom_schedule` verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringPayment {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Per-occurrence amount for regular cadences; average amount for
    /// display when the schedule is custom.
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_count: Option<u32>,
    /// Legacy high-water mark for regular cadences: every occurrence on
    /// or before this date counts as processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed: Option<NaiveDate>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_schedule: Vec<PaymentScheduleItem>,
}

impl RecurringPayment {
    pub fn is_custom(&self) -> bool {
        self.frequency == Frequency::Custom
    }

    /// Sum of the explicit schedule amounts; zero for regular cadences.
    pub fn custom_schedule_total(&self) -> f64 {
        self.custom_schedule.iter().map(|item| item.amount).sum()
    }
}

/// Draft for creating a payment; the store assigns the id and activates it.
#[derive(Debug, Clone)]
pub struct NewRecurringPayment {
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    pub payment_count: Option<u32>,
    pub custom_schedule: Vec<PaymentScheduleItem>,
}

/// Field-wise update for an existing payment; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub payment_count: Option<Option<u32>>,
    pub last_processed: Option<Option<NaiveDate>>,
    pub is_active: Option<bool>,
    pub custom_schedule: Option<Vec<PaymentScheduleItem>>,
}
