//! Pure scheduling primitives: occurrence predicates and schedule
//! materialization. Everything here takes its reference date ("today")
//! as an explicit parameter and performs no I/O.

pub mod generator;
pub mod occurrence;

pub use generator::{pending_for_month, remaining_count, schedule_for};
pub use occurrence::{occurs_on, payment_occurs_on};
