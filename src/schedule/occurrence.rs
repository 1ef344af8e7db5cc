//! Decides whether a recurrence rule produces an occurrence on a given
//! calendar day.
//!
//! Two deliberately different strictness policies coexist. Income and
//! outgoing items use [`occurs_on`], whose weekly rule accepts any later
//! date on the same weekday. Recurring payments use
//! [`payment_occurs_on`], whose weekly rule requires an exact multiple
//! of seven days from the anchor. Unifying the two would change the
//! observable dates produced for already-persisted data.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Frequency, ItemFrequency, RecurringPayment};

/// Returns true when an income/outgoing recurrence anchored at `start`
/// produces an occurrence on `candidate`. Dates are compared at day
/// granularity.
pub fn occurs_on(start: NaiveDate, frequency: ItemFrequency, candidate: NaiveDate) -> bool {
    if candidate < start {
        return false;
    }
    match frequency {
        ItemFrequency::Daily => true,
        ItemFrequency::Weekly => candidate == start || candidate.weekday() == start.weekday(),
        ItemFrequency::Monthly => candidate == start || monthly_day_matches(start, candidate),
    }
}

/// Returns true when a recurring payment produces an occurrence on
/// `candidate`. Bounded by the payment's [start, end] window; weekly
/// cadence is the strict 7-day-multiple rule. Custom payments occur
/// exactly on their listed schedule dates.
pub fn payment_occurs_on(payment: &RecurringPayment, candidate: NaiveDate) -> bool {
    if payment.frequency == Frequency::Custom {
        return payment
            .custom_schedule
            .iter()
            .any(|item| item.date == candidate);
    }
    if candidate < payment.start_date || candidate > payment.end_date {
        return false;
    }
    match payment.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => (candidate - payment.start_date).num_days() % 7 == 0,
        Frequency::Monthly => {
            candidate == payment.start_date || monthly_day_matches(payment.start_date, candidate)
        }
        Frequency::Custom => unreachable!("handled above"),
    }
}

/// Day-of-month match with the end-of-month anchor policy: an anchor on
/// the last day of its month tracks the last day of every month, and an
/// anchor day that exceeds the candidate month's length clamps to that
/// month's last day.
fn monthly_day_matches(start: NaiveDate, candidate: NaiveDate) -> bool {
    let start_day = start.day();
    let last_of_start_month = days_in_month(start.year(), start.month());
    let last_of_candidate_month = days_in_month(candidate.year(), candidate.month());

    if start_day == last_of_start_month || start_day > last_of_candidate_month {
        candidate.day() == last_of_candidate_month
    } else {
        candidate.day() == start_day
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// Shifts a date by whole months, clamping the day to the target
/// month's length (Jan 31 + 1 month = Feb 29 in a leap year).
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}
