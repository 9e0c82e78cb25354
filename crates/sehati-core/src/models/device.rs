use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One push-capable client surface registered by a user.
///
/// `subscription` is the opaque browser push subscription. It is cleared on
/// unsubscribe and when the push service reports the endpoint as gone; a
/// device without a subscription is skipped by dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Device {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint: String,
    pub is_active: bool,
    pub subscription: Option<serde_json::Value>,
    pub device_info: Option<serde_json::Value>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Device {
    /// Active and still holding a subscription payload.
    pub fn is_deliverable(&self) -> bool {
        self.is_active && self.subscription.as_ref().is_some_and(|s| !s.is_null())
    }
}
