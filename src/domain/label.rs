use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable quick-add template for a recurring expense. Carries no
/// scheduling information of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringLabel {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl RecurringLabel {
    pub fn new(name: impl Into<String>, category: impl Into<String>, amount: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            amount,
            created_at: Utc::now(),
        }
    }
}
