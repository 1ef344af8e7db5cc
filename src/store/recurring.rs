//! Owns the recurring label and recurring payment collections.

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    Frequency, MonthKey, NewRecurringPayment, PaymentPatch, PaymentScheduleItem, RecurringLabel,
    RecurringPayment,
};
use crate::errors::{CoreError, Result};
use crate::schedule::generator;
use crate::storage::{keys, KeyValueStore};

/// Persistence-backed store for recurring labels and payments.
///
/// Collections load once at construction; every mutation rewrites the
/// affected collection's record in full. Absent or malformed records are
/// treated as empty, never as a startup failure.
pub struct RecurringStore {
    labels: Vec<RecurringLabel>,
    payments: Vec<RecurringPayment>,
    storage: Box<dyn KeyValueStore>,
}

impl RecurringStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Result<Self> {
        let labels = load_collection(storage.as_ref(), keys::RECURRING_LABELS)?;
        let payments = load_collection(storage.as_ref(), keys::RECURRING_PAYMENTS)?;
        Ok(Self {
            labels,
            payments,
            storage,
        })
    }

    pub fn labels(&self) -> &[RecurringLabel] {
        &self.labels
    }

    pub fn payments(&self) -> &[RecurringPayment] {
        &self.payments
    }

    pub fn payment(&self, id: Uuid) -> Option<&RecurringPayment> {
        self.payments.iter().find(|payment| payment.id == id)
    }

    /// Creates a label and returns its id.
    pub fn add_label(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        amount: Option<f64>,
    ) -> Result<Uuid> {
        let label = RecurringLabel::new(name, category, amount);
        let id = label.id;
        self.labels.push(label);
        self.save_labels()?;
        Ok(id)
    }

    /// Deletes a label; unknown ids are ignored.
    pub fn remove_label(&mut self, id: Uuid) -> Result<()> {
        let before = self.labels.len();
        self.labels.retain(|label| label.id != id);
        if self.labels.len() != before {
            self.save_labels()?;
        }
        Ok(())
    }

    /// Creates an active payment from a draft and returns its id.
    /// Custom schedules are sorted by date; duplicate dates within one
    /// schedule are rejected since (payment, date) is the occurrence key.
    pub fn add_payment(&mut self, draft: NewRecurringPayment) -> Result<Uuid> {
        let custom_schedule = normalize_custom_schedule(draft.custom_schedule)?;
        let payment = RecurringPayment {
            id: Uuid::new_v4(),
            name: draft.name,
            category: draft.category,
            amount: draft.amount,
            start_date: draft.start_date,
            end_date: draft.end_date,
            frequency: draft.frequency,
            payment_count: draft.payment_count,
            last_processed: None,
            is_active: true,
            custom_schedule,
        };
        let id = payment.id;
        self.payments.push(payment);
        self.save_payments()?;
        Ok(id)
    }

    /// Merges the patch into the payment; returns false (without
    /// persisting) when the id is unknown.
    pub fn update_payment(&mut self, id: Uuid, patch: PaymentPatch) -> Result<bool> {
        let custom_schedule = match patch.custom_schedule {
            Some(schedule) => Some(normalize_custom_schedule(schedule)?),
            None => None,
        };
        let Some(payment) = self.payments.iter_mut().find(|payment| payment.id == id) else {
            return Ok(false);
        };
        if let Some(name) = patch.name {
            payment.name = name;
        }
        if let Some(category) = patch.category {
            payment.category = category;
        }
        if let Some(amount) = patch.amount {
            payment.amount = amount;
        }
        if let Some(start_date) = patch.start_date {
            payment.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            payment.end_date = end_date;
        }
        if let Some(frequency) = patch.frequency {
            payment.frequency = frequency;
        }
        if let Some(payment_count) = patch.payment_count {
            payment.payment_count = payment_count;
        }
        if let Some(last_processed) = patch.last_processed {
            payment.last_processed = last_processed;
        }
        if let Some(is_active) = patch.is_active {
            payment.is_active = is_active;
        }
        if let Some(schedule) = custom_schedule {
            payment.custom_schedule = schedule;
        }
        self.save_payments()?;
        Ok(true)
    }

    /// Deletes a payment; unknown ids are ignored.
    pub fn remove_payment(&mut self, id: Uuid) -> Result<()> {
        let before = self.payments.len();
        self.payments.retain(|payment| payment.id != id);
        if self.payments.len() != before {
            self.save_payments()?;
        }
        Ok(())
    }

    /// Marks one occurrence of a payment as processed.
    ///
    /// Custom payments flag the schedule entry whose date equals
    /// `scheduled_date`; a missing entry (or an omitted date) leaves the
    /// state untouched. Regular payments advance `last_processed` to the
    /// given date, defaulting to `today`, which marks every occurrence up
    /// to and including that date.
    pub fn mark_processed(
        &mut self,
        payment_id: Uuid,
        scheduled_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<()> {
        let Some(payment) = self
            .payments
            .iter_mut()
            .find(|payment| payment.id == payment_id)
        else {
            return Ok(());
        };
        let changed = if payment.frequency == Frequency::Custom {
            match scheduled_date.and_then(|date| {
                payment
                    .custom_schedule
                    .iter_mut()
                    .find(|item| item.date == date)
            }) {
                Some(item) => {
                    item.processed = true;
                    true
                }
                None => {
                    debug!(%payment_id, ?scheduled_date, "no matching custom schedule entry");
                    false
                }
            }
        } else {
            payment.last_processed = Some(scheduled_date.unwrap_or(today));
            true
        };
        if changed {
            self.save_payments()?;
        }
        Ok(())
    }

    /// True when the payment still has unprocessed occurrences in `month`.
    pub fn is_pending_for_month(
        &self,
        payment: &RecurringPayment,
        month: MonthKey,
        today: NaiveDate,
    ) -> bool {
        !generator::pending_for_month(payment, month, today).is_empty()
    }

    /// Unprocessed occurrences of the payment within `month`.
    pub fn pending_for_month(
        &self,
        payment: &RecurringPayment,
        month: MonthKey,
        today: NaiveDate,
    ) -> Vec<PaymentScheduleItem> {
        generator::pending_for_month(payment, month, today)
    }

    /// Active payments, cloned as a snapshot for the prediction walk.
    pub fn active_payments(&self) -> Vec<RecurringPayment> {
        self.payments
            .iter()
            .filter(|payment| payment.is_active)
            .cloned()
            .collect()
    }

    /// Active payments that have run their course: past their end date or
    /// out of unprocessed occurrences.
    pub fn expired_payments(&self, today: NaiveDate) -> Vec<&RecurringPayment> {
        self.payments
            .iter()
            .filter(|payment| payment.is_active && is_expired(payment, today))
            .collect()
    }

    /// Deactivates every expired payment. Only ever flips active to
    /// inactive, so repeated calls (e.g. from a periodic trigger) are
    /// safe no-ops once the flag is cleared.
    pub fn cleanup_expired(&mut self, today: NaiveDate) -> Result<usize> {
        let mut flipped = 0;
        for payment in &mut self.payments {
            if payment.is_active && is_expired(payment, today) {
                payment.is_active = false;
                flipped += 1;
            }
        }
        if flipped > 0 {
            debug!(flipped, "deactivated expired recurring payments");
            self.save_payments()?;
        }
        Ok(flipped)
    }

    /// Occurrences that should have happened between the payment's start
    /// and min(today, end date), regardless of processing state.
    pub fn payments_made_since_start(&self, payment: &RecurringPayment, today: NaiveDate) -> usize {
        if today < payment.start_date {
            return 0;
        }
        let horizon = today.min(payment.end_date);
        generator::schedule_for(payment, today)
            .iter()
            .filter(|item| item.date <= horizon)
            .count()
    }

    fn save_labels(&self) -> Result<()> {
        let json = serde_json::to_string(&self.labels)?;
        self.storage.put(keys::RECURRING_LABELS, &json)
    }

    fn save_payments(&self) -> Result<()> {
        let json = serde_json::to_string(&self.payments)?;
        self.storage.put(keys::RECURRING_PAYMENTS, &json)
    }
}

fn is_expired(payment: &RecurringPayment, today: NaiveDate) -> bool {
    payment.end_date < today || generator::remaining_count(payment, today) == 0
}

/// Sorts a custom schedule by date and rejects duplicate dates.
fn normalize_custom_schedule(
    mut schedule: Vec<PaymentScheduleItem>,
) -> Result<Vec<PaymentScheduleItem>> {
    schedule.sort_by_key(|item| item.date);
    for pair in schedule.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(CoreError::InvalidInput(format!(
                "duplicate custom schedule date {}",
                pair[0].date
            )));
        }
    }
    Ok(schedule)
}

pub(crate) fn load_collection<T: serde::de::DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>> {
    match storage.get(key)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(key, %err, "malformed persisted record, starting empty");
                Ok(Vec::new())
            }
        },
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> RecurringStore {
        RecurringStore::new(Box::new(MemoryStore::new())).unwrap()
    }

    fn monthly_draft(start: NaiveDate, end: NaiveDate) -> NewRecurringPayment {
        NewRecurringPayment {
            name: "Gym".into(),
            category: "Health".into(),
            amount: 35.0,
            start_date: start,
            end_date: end,
            frequency: Frequency::Monthly,
            payment_count: None,
            custom_schedule: Vec::new(),
        }
    }

    fn custom_draft(items: Vec<PaymentScheduleItem>) -> NewRecurringPayment {
        NewRecurringPayment {
            name: "Laptop x3".into(),
            category: "Tech".into(),
            amount: 300.0,
            start_date: items.first().map(|i| i.date).unwrap_or(date(2024, 1, 1)),
            end_date: items.last().map(|i| i.date).unwrap_or(date(2024, 1, 1)),
            frequency: Frequency::Custom,
            payment_count: Some(items.len() as u32),
            custom_schedule: items,
        }
    }

    fn item(d: NaiveDate, amount: f64) -> PaymentScheduleItem {
        PaymentScheduleItem {
            date: d,
            amount,
            processed: false,
        }
    }

    #[test]
    fn labels_are_created_and_removed_idempotently() {
        let mut store = store();
        let id = store.add_label("Netflix", "Leisure", Some(15.0)).unwrap();
        assert_eq!(store.labels().len(), 1);
        assert_eq!(store.labels()[0].id, id);

        store.remove_label(id).unwrap();
        store.remove_label(id).unwrap();
        assert!(store.labels().is_empty());
    }

    #[test]
    fn added_payments_start_active() {
        let mut store = store();
        let id = store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 6, 1)))
            .unwrap();
        let payment = store.payment(id).unwrap();
        assert!(payment.is_active);
        assert!(payment.last_processed.is_none());
    }

    #[test]
    fn update_of_unknown_payment_is_a_noop() {
        let mut store = store();
        let patch = PaymentPatch {
            amount: Some(99.0),
            ..Default::default()
        };
        assert!(!store.update_payment(Uuid::new_v4(), patch).unwrap());
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let mut store = store();
        let id = store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 6, 1)))
            .unwrap();
        let patch = PaymentPatch {
            amount: Some(40.0),
            end_date: Some(date(2024, 9, 1)),
            ..Default::default()
        };
        assert!(store.update_payment(id, patch).unwrap());
        let payment = store.payment(id).unwrap();
        assert_eq!(payment.amount, 40.0);
        assert_eq!(payment.end_date, date(2024, 9, 1));
        assert_eq!(payment.name, "Gym");
        assert_eq!(payment.start_date, date(2024, 1, 1));
    }

    #[test]
    fn duplicate_custom_dates_are_rejected() {
        let mut store = store();
        let err = store
            .add_payment(custom_draft(vec![
                item(date(2024, 2, 1), 100.0),
                item(date(2024, 2, 1), 120.0),
            ]))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert!(store.payments().is_empty());
    }

    #[test]
    fn custom_schedules_are_stored_sorted() {
        let mut store = store();
        let id = store
            .add_payment(custom_draft(vec![
                item(date(2024, 3, 1), 100.0),
                item(date(2024, 1, 1), 100.0),
                item(date(2024, 2, 1), 100.0),
            ]))
            .unwrap();
        let dates: Vec<_> = store.payment(id).unwrap()
            .custom_schedule
            .iter()
            .map(|i| i.date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn mark_processed_flags_the_matching_custom_entry() {
        let mut store = store();
        let id = store
            .add_payment(custom_draft(vec![
                item(date(2024, 2, 1), 100.0),
                item(date(2024, 3, 1), 100.0),
            ]))
            .unwrap();
        store
            .mark_processed(id, Some(date(2024, 2, 1)), date(2024, 1, 15))
            .unwrap();
        let payment = store.payment(id).unwrap();
        assert!(payment.custom_schedule[0].processed);
        assert!(!payment.custom_schedule[1].processed);

        // A date with no matching entry changes nothing.
        store
            .mark_processed(id, Some(date(2024, 4, 1)), date(2024, 1, 15))
            .unwrap();
        let payment = store.payment(id).unwrap();
        assert!(!payment.custom_schedule[1].processed);
    }

    #[test]
    fn mark_processed_sets_last_processed_for_regular_payments() {
        let mut store = store();
        let id = store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 6, 1)))
            .unwrap();
        store
            .mark_processed(id, Some(date(2024, 2, 1)), date(2024, 1, 15))
            .unwrap();
        assert_eq!(
            store.payment(id).unwrap().last_processed,
            Some(date(2024, 2, 1))
        );

        // Omitted date defaults to today.
        store.mark_processed(id, None, date(2024, 3, 10)).unwrap();
        assert_eq!(
            store.payment(id).unwrap().last_processed,
            Some(date(2024, 3, 10))
        );
    }

    #[test]
    fn cleanup_deactivates_expired_payments_once() {
        let mut store = store();
        let expired = store
            .add_payment(monthly_draft(date(2023, 1, 1), date(2023, 6, 1)))
            .unwrap();
        let active = store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 12, 1)))
            .unwrap();

        let today = date(2024, 2, 1);
        assert_eq!(store.cleanup_expired(today).unwrap(), 1);
        assert!(!store.payment(expired).unwrap().is_active);
        assert!(store.payment(active).unwrap().is_active);

        // Idempotent on a second run.
        assert_eq!(store.cleanup_expired(today).unwrap(), 0);
    }

    #[test]
    fn cleanup_deactivates_fully_processed_custom_payments() {
        let mut store = store();
        let id = store
            .add_payment(custom_draft(vec![
                item(date(2024, 2, 1), 100.0),
                item(date(2024, 3, 1), 100.0),
            ]))
            .unwrap();
        let today = date(2024, 1, 15);
        store.mark_processed(id, Some(date(2024, 2, 1)), today).unwrap();
        store.mark_processed(id, Some(date(2024, 3, 1)), today).unwrap();

        assert_eq!(store.cleanup_expired(today).unwrap(), 1);
        assert!(!store.payment(id).unwrap().is_active);
    }

    #[test]
    fn active_payments_returns_a_snapshot_of_active_only() {
        let mut store = store();
        let keep = store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 12, 1)))
            .unwrap();
        let drop = store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 12, 1)))
            .unwrap();
        store
            .update_payment(
                drop,
                PaymentPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let snapshot = store.active_payments();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, keep);
    }

    #[test]
    fn payments_made_counts_elapsed_occurrences() {
        let mut store = store();
        let id = store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 6, 1)))
            .unwrap();
        let payment = store.payment(id).unwrap().clone();
        assert_eq!(store.payments_made_since_start(&payment, date(2023, 12, 1)), 0);
        assert_eq!(store.payments_made_since_start(&payment, date(2024, 3, 15)), 3);
        // Past the end date, the horizon clamps to the end date.
        assert_eq!(store.payments_made_since_start(&payment, date(2025, 1, 1)), 6);
    }

    #[test]
    fn collections_reload_from_the_same_backend() {
        let backend = std::sync::Arc::new(MemoryStore::new());
        // The store owns a boxed port; share the backend through a thin
        // forwarding wrapper.
        struct Shared(std::sync::Arc<MemoryStore>);
        impl KeyValueStore for Shared {
            fn get(&self, key: &str) -> Result<Option<String>> {
                self.0.get(key)
            }
            fn put(&self, key: &str, value: &str) -> Result<()> {
                self.0.put(key, value)
            }
            fn remove(&self, key: &str) -> Result<()> {
                self.0.remove(key)
            }
        }

        let mut store = RecurringStore::new(Box::new(Shared(backend.clone()))).unwrap();
        store.add_label("Rent", "Housing", Some(500.0)).unwrap();
        store
            .add_payment(monthly_draft(date(2024, 1, 1), date(2024, 6, 1)))
            .unwrap();

        let reloaded = RecurringStore::new(Box::new(Shared(backend))).unwrap();
        assert_eq!(reloaded.labels().len(), 1);
        assert_eq!(reloaded.payments().len(), 1);
    }

    #[test]
    fn malformed_records_fall_back_to_empty() {
        let backend = MemoryStore::new();
        backend.put(keys::RECURRING_LABELS, "not json").unwrap();
        backend.put(keys::RECURRING_PAYMENTS, "{\"wrong\": 1}").unwrap();
        let store = RecurringStore::new(Box::new(backend)).unwrap();
        assert!(store.labels().is_empty());
        assert!(store.payments().is_empty());
    }
}
