#![doc(test(attr(deny(warnings))))]

//! Finance Core offers the scheduling, recurrence, and cash-flow
//! prediction primitives that power a personal expense tracker, together
//! with the expense/budget collaborators and report helpers the tracker
//! UI consumes.

pub mod config;
pub mod csv_io;
pub mod domain;
pub mod errors;
pub mod report;
pub mod schedule;
pub mod storage;
pub mod store;

pub use errors::{CoreError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("finance_core=info".parse().unwrap());
        fmt().with_env_filter(filter).init();
        tracing::info!("Finance Core tracing initialized.");
    });
}
