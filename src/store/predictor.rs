//! Projects a bank balance forward by simulating every day between
//! tomorrow and a target date.

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    DailyBreakdown, Expense, IncomeItem, MoneyPrediction, NewIncomeItem, NewOutgoingItem,
    OutgoingItem, PredictedTransaction, RecurringPayment, TransactionKind,
};
use crate::errors::Result;
use crate::schedule::{generator, occurrence};
use crate::storage::{keys, KeyValueStore};

use super::recurring::load_collection;

/// Persistence-backed store for the current balance and the one-off or
/// recurring income/outgoing items feeding predictions.
///
/// Recurring payments and raw expenses belong to other stores; every
/// prediction call receives them as snapshots so the walk always sees
/// the caller's current state.
pub struct MoneyPredictor {
    current_balance: f64,
    income_items: Vec<IncomeItem>,
    outgoing_items: Vec<OutgoingItem>,
    storage: Box<dyn KeyValueStore>,
}

impl MoneyPredictor {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Result<Self> {
        let current_balance = match storage.get(keys::BANK_BALANCE)? {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(value) => value,
                Err(err) => {
                    warn!(%err, "malformed persisted balance, starting at zero");
                    0.0
                }
            },
            None => 0.0,
        };
        let income_items = load_collection(storage.as_ref(), keys::INCOME_ITEMS)?;
        let outgoing_items = load_collection(storage.as_ref(), keys::OUTGOING_ITEMS)?;
        Ok(Self {
            current_balance,
            income_items,
            outgoing_items,
            storage,
        })
    }

    pub fn current_balance(&self) -> f64 {
        self.current_balance
    }

    pub fn income_items(&self) -> &[IncomeItem] {
        &self.income_items
    }

    pub fn outgoing_items(&self) -> &[OutgoingItem] {
        &self.outgoing_items
    }

    /// Overwrites the tracked bank balance.
    pub fn set_balance(&mut self, value: f64) -> Result<()> {
        self.current_balance = value;
        self.storage.put(keys::BANK_BALANCE, &value.to_string())
    }

    pub fn add_income(&mut self, draft: NewIncomeItem) -> Result<Uuid> {
        let item = IncomeItem {
            id: Uuid::new_v4(),
            name: draft.name,
            amount: draft.amount,
            date: draft.date,
            is_recurring: draft.is_recurring,
            frequency: draft.frequency,
        };
        let id = item.id;
        self.income_items.push(item);
        self.save_income()?;
        Ok(id)
    }

    /// Deletes an income item; unknown ids are ignored.
    pub fn remove_income(&mut self, id: Uuid) -> Result<()> {
        let before = self.income_items.len();
        self.income_items.retain(|item| item.id != id);
        if self.income_items.len() != before {
            self.save_income()?;
        }
        Ok(())
    }

    pub fn add_outgoing(&mut self, draft: NewOutgoingItem) -> Result<Uuid> {
        let item = OutgoingItem {
            id: Uuid::new_v4(),
            name: draft.name,
            amount: draft.amount,
            date: draft.date,
            category: draft.category,
            is_recurring: draft.is_recurring,
            frequency: draft.frequency,
        };
        let id = item.id;
        self.outgoing_items.push(item);
        self.save_outgoing()?;
        Ok(id)
    }

    /// Deletes an outgoing item; unknown ids are ignored.
    pub fn remove_outgoing(&mut self, id: Uuid) -> Result<()> {
        let before = self.outgoing_items.len();
        self.outgoing_items.retain(|item| item.id != id);
        if self.outgoing_items.len() != before {
            self.save_outgoing()?;
        }
        Ok(())
    }

    /// Every transaction expected on `date`, in insertion order: income
    /// items, outgoing items, recurring payments, then future-dated
    /// expenses. Recurring payments contribute only unprocessed schedule
    /// occurrences; expenses dated today or earlier are skipped since
    /// past spending is already reflected in the balance.
    pub fn transactions_on_date(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        payments: &[RecurringPayment],
        expenses: &[Expense],
    ) -> Vec<PredictedTransaction> {
        let mut transactions = Vec::new();

        for item in &self.income_items {
            let matches = match (item.is_recurring, item.frequency) {
                (true, Some(frequency)) => occurrence::occurs_on(item.date, frequency, date),
                _ => item.date == date,
            };
            if matches {
                let name = if item.is_recurring && item.frequency.is_some() {
                    format!("{} (Recurring)", item.name)
                } else {
                    item.name.clone()
                };
                transactions.push(PredictedTransaction {
                    name,
                    amount: item.amount,
                    kind: TransactionKind::Income,
                    date,
                });
            }
        }

        for item in &self.outgoing_items {
            let matches = match (item.is_recurring, item.frequency) {
                (true, Some(frequency)) => occurrence::occurs_on(item.date, frequency, date),
                _ => item.date == date,
            };
            if matches {
                let name = if item.is_recurring && item.frequency.is_some() {
                    format!("{} (Recurring)", item.name)
                } else {
                    item.name.clone()
                };
                transactions.push(PredictedTransaction {
                    name,
                    amount: -item.amount,
                    kind: TransactionKind::Outgoing,
                    date,
                });
            }
        }

        for payment in payments {
            if !payment.is_active {
                continue;
            }
            // The generated schedule is the single authority on payment
            // dates; for end-of-month anchors its clamped dates (Apr 30
            // -> May 30) differ from the occurrence predicate's.
            let schedule = generator::schedule_for(payment, today);
            if let Some(item) = schedule
                .iter()
                .find(|item| item.date == date && !item.processed)
            {
                transactions.push(PredictedTransaction {
                    name: format!("{} (Recurring Payment)", payment.name),
                    amount: -item.amount,
                    kind: TransactionKind::Outgoing,
                    date,
                });
            }
        }

        if date > today {
            for expense in expenses {
                if expense.date == date {
                    let label = expense.note.as_deref().unwrap_or("Expense");
                    transactions.push(PredictedTransaction {
                        name: format!("{} ({})", label, expense.category),
                        amount: -expense.amount,
                        kind: TransactionKind::Outgoing,
                        date,
                    });
                }
            }
        }

        transactions
    }

    /// Walks day by day from tomorrow through `target_date` inclusive,
    /// accumulating a running balance. A target on or before `today`
    /// produces an empty breakdown with the balance unchanged.
    pub fn predict(
        &self,
        target_date: NaiveDate,
        today: NaiveDate,
        payments: &[RecurringPayment],
        expenses: &[Expense],
    ) -> MoneyPrediction {
        let mut running_balance = self.current_balance;
        let mut daily_breakdown = Vec::new();

        let mut day = today + Duration::days(1);
        while day <= target_date {
            let transactions = self.transactions_on_date(day, today, payments, expenses);
            let day_change: f64 = transactions.iter().map(|txn| txn.amount).sum();
            running_balance += day_change;
            daily_breakdown.push(DailyBreakdown {
                date: day,
                balance: running_balance,
                transactions,
            });
            day += Duration::days(1);
        }

        debug!(
            %target_date,
            days = daily_breakdown.len(),
            predicted = running_balance,
            "prediction walk complete"
        );

        MoneyPrediction {
            current_balance: self.current_balance,
            predicted_balance: running_balance,
            target_date,
            daily_breakdown,
        }
    }

    fn save_income(&self) -> Result<()> {
        let json = serde_json::to_string(&self.income_items)?;
        self.storage.put(keys::INCOME_ITEMS, &json)
    }

    fn save_outgoing(&self) -> Result<()> {
        let json = serde_json::to_string(&self.outgoing_items)?;
        self.storage.put(keys::OUTGOING_ITEMS, &json)
    }
}
