//! End-to-end recurrence behavior through the recurring store.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use finance_core::domain::{
    Frequency, ItemFrequency, NewRecurringPayment, PaymentPatch, PaymentScheduleItem,
};
use finance_core::schedule::{occurs_on, payment_occurs_on, remaining_count, schedule_for};
use finance_core::storage::MemoryStore;
use finance_core::store::RecurringStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> RecurringStore {
    RecurringStore::new(Box::new(MemoryStore::new())).unwrap()
}

fn draft(
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
    payment_count: Option<u32>,
    custom_schedule: Vec<PaymentScheduleItem>,
) -> NewRecurringPayment {
    NewRecurringPayment {
        name: name.into(),
        category: "Bills".into(),
        amount: 100.0,
        start_date: start,
        end_date: end,
        frequency,
        payment_count,
        custom_schedule,
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
fn monthly_end_of_month_payment_tracks_short_months() {
    let mut store = store();
    let id = store
        .add_payment(draft(
            "Salary transfer",
            date(2024, 1, 31),
            date(2024, 6, 30),
            Frequency::Monthly,
            None,
            Vec::new(),
        ))
        .unwrap();
    let payment = store.payment(id).unwrap().clone();

    assert!(payment_occurs_on(&payment, date(2024, 2, 29)));
    assert!(payment_occurs_on(&payment, date(2024, 4, 30)));
    assert!(!payment_occurs_on(&payment, date(2024, 2, 28)));

    let dates: Vec<_> = schedule_for(&payment, date(2024, 1, 1))
        .iter()
        .map(|item| item.date)
        .collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 1, 31),
            date(2024, 2, 29),
            date(2024, 3, 31),
            date(2024, 4, 30),
            date(2024, 5, 31),
            date(2024, 6, 30),
        ]
    );
}

#[test]
fn weekly_item_hits_the_same_weekday_for_eight_weeks() {
    // 2024-01-05 is a Friday.
    let start = date(2024, 1, 5);
    assert_eq!(start.weekday(), Weekday::Fri);

    let mut matched = 0;
    for offset in 0..=(8 * 7) {
        let candidate = start + Duration::days(offset);
        if occurs_on(start, ItemFrequency::Weekly, candidate) {
            assert_eq!(candidate.weekday(), Weekday::Fri);
            matched += 1;
        }
    }
    assert_eq!(matched, 9);
}

#[test]
fn custom_processed_marks_never_revert() {
    let mut store = store();
    let id = store
        .add_payment(draft(
            "Laptop installments",
            date(2024, 2, 1),
            date(2024, 4, 1),
            Frequency::Custom,
            Some(3),
            vec![
                item(date(2024, 2, 1), 300.0),
                item(date(2024, 3, 1), 300.0),
                item(date(2024, 4, 1), 400.0),
            ],
        ))
        .unwrap();

    let today = date(2024, 1, 15);
    store.mark_processed(id, Some(date(2024, 3, 1)), today).unwrap();

    let payment = store.payment(id).unwrap().clone();
    let flags: Vec<_> = schedule_for(&payment, today)
        .iter()
        .map(|item| item.processed)
        .collect();
    assert_eq!(flags, vec![false, true, false]);

    // Marking the same entry again changes nothing, and deriving with an
    // earlier reference date keeps the explicit mark.
    store.mark_processed(id, Some(date(2024, 3, 1)), today).unwrap();
    let payment = store.payment(id).unwrap().clone();
    let earlier = schedule_for(&payment, date(2024, 1, 1));
    assert!(earlier[1].processed);
    assert_eq!(remaining_count(&payment, today), 2);
}

#[test]
fn payment_count_bounds_the_schedule_and_remaining_derives_from_it() {
    let mut store = store();
    let id = store
        .add_payment(draft(
            "Course fee",
            date(2024, 1, 10),
            date(2024, 12, 10),
            Frequency::Monthly,
            Some(3),
            Vec::new(),
        ))
        .unwrap();
    let payment = store.payment(id).unwrap().clone();

    let schedule = schedule_for(&payment, date(2024, 1, 1));
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule.last().unwrap().date, date(2024, 3, 10));

    assert_eq!(remaining_count(&payment, date(2024, 1, 1)), 3);
    store
        .mark_processed(id, Some(date(2024, 1, 10)), date(2024, 1, 10))
        .unwrap();
    let payment = store.payment(id).unwrap().clone();
    assert_eq!(remaining_count(&payment, date(2024, 1, 11)), 2);
    assert_eq!(remaining_count(&payment, date(2024, 4, 1)), 0);
}

#[test]
fn cleanup_never_reactivates_a_payment() {
    let mut store = store();
    let id = store
        .add_payment(draft(
            "Old subscription",
            date(2023, 1, 1),
            date(2023, 6, 1),
            Frequency::Monthly,
            None,
            Vec::new(),
        ))
        .unwrap();

    let today = date(2024, 1, 1);
    assert_eq!(store.cleanup_expired(today).unwrap(), 1);
    assert_eq!(store.cleanup_expired(today).unwrap(), 0);

    // Even a manual reactivation followed by cleanup only ever flips the
    // flag back off; nothing is resurrected past its end date.
    store
        .update_payment(
            id,
            PaymentPatch {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(store.cleanup_expired(today).unwrap(), 1);
    assert!(!store.payment(id).unwrap().is_active);
}

#[test]
fn pending_for_month_reflects_processing_state() {
    let mut store = store();
    let id = store
        .add_payment(draft(
            "Gym",
            date(2024, 1, 15),
            date(2024, 12, 15),
            Frequency::Monthly,
            None,
            Vec::new(),
        ))
        .unwrap();
    let today = date(2024, 1, 1);
    let february = "2024-02".parse().unwrap();

    let payment = store.payment(id).unwrap().clone();
    assert!(store.is_pending_for_month(&payment, february, today));

    store
        .mark_processed(id, Some(date(2024, 2, 15)), today)
        .unwrap();
    let payment = store.payment(id).unwrap().clone();
    assert!(!store.is_pending_for_month(&payment, february, today));
    let march = "2024-03".parse().unwrap();
    assert!(store.is_pending_for_month(&payment, march, today));
}
