//! Persisted and ephemeral data model for the finance tracker core.

pub mod expense;
pub mod frequency;
pub mod label;
pub mod money;
pub mod payment;
pub mod prediction;

pub use expense::{Budget, Expense};
pub use frequency::{Frequency, ItemFrequency, MonthKey};
pub use label::RecurringLabel;
pub use money::{IncomeItem, NewIncomeItem, NewOutgoingItem, OutgoingItem};
pub use payment::{NewRecurringPayment, PaymentPatch, PaymentScheduleItem, RecurringPayment};
pub use prediction::{DailyBreakdown, MoneyPrediction, PredictedTransaction, TransactionKind};
