//! Persistence boundary: a small key-value port plus the backends that
//! implement it. Each persisted collection lives under one fixed key as
//! a single serialized record.

pub mod json_backend;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::Result;

/// Stable record keys shared with earlier versions of the tracker.
pub mod keys {
    pub const RECURRING_LABELS: &str = "expense-tracker-recurring-labels";
    pub const RECURRING_PAYMENTS: &str = "expense-tracker-recurring-payments";
    pub const BANK_BALANCE: &str = "expense-tracker-bank-balance";
    pub const INCOME_ITEMS: &str = "expense-tracker-income-items";
    pub const OUTGOING_ITEMS: &str = "expense-tracker-outgoing-items";
}

/// Abstraction over persistence backends storing opaque string records
/// under stable keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backend. Useful for tests and for hosts that supply their
/// own persistence at a different layer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let records = self.records.lock().expect("memory store poisoned");
        Ok(records.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut records = self.records.lock().expect("memory store poisoned");
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut records = self.records.lock().expect("memory store poisoned");
        records.remove(key);
        Ok(())
    }
}

pub use json_backend::JsonFileStore;
