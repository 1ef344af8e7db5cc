//! Materializes the concrete occurrence list of a recurring payment.
//!
//! The generated schedule is the source of truth for pending and
//! remaining-payment queries; any stored payment count only caps
//! generation and is never read back for display.

use chrono::{Duration, NaiveDate};

use crate::domain::{Frequency, MonthKey, PaymentScheduleItem, RecurringPayment};

use super::occurrence::shift_month;

/// Hard cap on generated occurrences, guarding daily cadences over very
/// wide date windows.
const MAX_SCHEDULE_OCCURRENCES: usize = 1024;

/// Expands a payment into its full ordered occurrence list.
///
/// Custom payments return their explicit schedule with `processed`
/// recomputed as `stored || date < today`: past occurrences always read
/// as processed, explicit marks are never un-set. Regular cadences step
/// from `start_date` to `end_date` inclusive, each occurrence carrying
/// the payment's base amount; an occurrence is processed when it is on
/// or before `last_processed`, or strictly before `today`.
pub fn schedule_for(payment: &RecurringPayment, today: NaiveDate) -> Vec<PaymentScheduleItem> {
    if payment.frequency == Frequency::Custom {
        return payment
            .custom_schedule
            .iter()
            .map(|item| PaymentScheduleItem {
                date: item.date,
                amount: item.amount,
                processed: item.processed || item.date < today,
            })
            .collect();
    }

    let mut schedule = Vec::new();
    let cap = payment
        .payment_count
        .map(|count| count as usize)
        .unwrap_or(MAX_SCHEDULE_OCCURRENCES)
        .min(MAX_SCHEDULE_OCCURRENCES);

    for index in 0..cap {
        // Each occurrence is derived from the start anchor rather than
        // the previous occurrence, so a Jan 31 monthly anchor yields
        // Feb 29 and then Mar 31, not Mar 29.
        let date = match payment.frequency {
            Frequency::Daily => payment.start_date + Duration::days(index as i64),
            Frequency::Weekly => payment.start_date + Duration::weeks(index as i64),
            Frequency::Monthly => shift_month(payment.start_date, index as i32),
            Frequency::Custom => unreachable!("handled above"),
        };
        if date > payment.end_date {
            break;
        }
        let processed =
            payment.last_processed.is_some_and(|mark| date <= mark) || date < today;
        schedule.push(PaymentScheduleItem {
            date,
            amount: payment.amount,
            processed,
        });
    }
    schedule
}

/// Occurrences of `payment` that fall inside `month` and are still
/// unprocessed.
pub fn pending_for_month(
    payment: &RecurringPayment,
    month: MonthKey,
    today: NaiveDate,
) -> Vec<PaymentScheduleItem> {
    schedule_for(payment, today)
        .into_iter()
        .filter(|item| month.contains(item.date) && !item.processed)
        .collect()
}

/// Count of unprocessed occurrences dated today or later. Derived from
/// the schedule itself, superseding any stored remaining-payment field.
pub fn remaining_count(payment: &RecurringPayment, today: NaiveDate) -> usize {
    schedule_for(payment, today)
        .iter()
        .filter(|item| item.date >= today && !item.processed)
        .count()
}
