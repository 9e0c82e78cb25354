use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Outcome of one delivery attempt to one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
}

/// Per-device delivery ledger, keyed by device id.
pub type DeliveryLedger = BTreeMap<Uuid, DeliveryOutcome>;

/// One dispatch, as persisted. Only `is_read` changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub devices_sent_to: u32,
    pub delivery_status: DeliveryLedger,
    #[serde(default)]
    pub is_read: bool,
    pub sent_at: jiff::Timestamp,
    pub created_at: jiff::Timestamp,
}

impl Notification {
    pub fn success_count(&self) -> usize {
        self.delivery_status
            .values()
            .filter(|o| **o == DeliveryOutcome::Delivered)
            .count()
    }
}
