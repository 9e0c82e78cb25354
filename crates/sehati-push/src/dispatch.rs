use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use sehati_core::models::notification::{DeliveryLedger, DeliveryOutcome, Notification};
use sehati_core::tables;
use sehati_storage::records::insert_record;
use sehati_storage::RecordStore;

use crate::bus::EventBus;
use crate::devices;
use crate::error::PushError;
use crate::payload::{PushDefaults, PushPayload};
use crate::transport::PushTransport;

pub const DEFAULT_NOTIFICATION_TYPE: &str = "info";

/// One message addressed to every device of one user.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
}

impl DispatchRequest {
    pub fn new(user_id: Uuid, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            message: message.into(),
            notification_type: DEFAULT_NOTIFICATION_TYPE.to_string(),
        }
    }

    pub fn with_type(mut self, notification_type: impl Into<String>) -> Self {
        self.notification_type = notification_type.into();
        self
    }
}

/// What a dispatch did. Individual delivery failures live in
/// `delivery_status`; they never make the dispatch itself fail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub success: bool,
    pub devices_count: usize,
    pub success_count: usize,
    pub delivery_status: DeliveryLedger,
    pub notification_id: Uuid,
}

/// Announced on the bus after a dispatch is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchEvent {
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub sent_at: jiff::Timestamp,
}

impl From<&Notification> for DispatchEvent {
    fn from(n: &Notification) -> Self {
        Self {
            notification_id: n.id,
            user_id: n.user_id,
            title: n.title.clone(),
            message: n.message.clone(),
            notification_type: n.notification_type.clone(),
            sent_at: n.sent_at,
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn RecordStore>,
    transport: Arc<dyn PushTransport>,
    defaults: PushDefaults,
    events: EventBus<DispatchEvent>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn RecordStore>,
        transport: Arc<dyn PushTransport>,
        defaults: PushDefaults,
    ) -> Self {
        Self {
            store,
            transport,
            defaults,
            events: EventBus::new(),
        }
    }

    /// Bus carrying one [`DispatchEvent`] per completed dispatch.
    pub fn events(&self) -> &EventBus<DispatchEvent> {
        &self.events
    }

    /// Deliver `req` to every deliverable device of its user, then persist
    /// the notification with its per-device ledger.
    ///
    /// Fails only if the device list cannot be read or the notification
    /// cannot be written.
    pub async fn dispatch(&self, req: DispatchRequest) -> Result<DispatchReport, PushError> {
        let store = self.store.as_ref();
        let targets = devices::active_devices(store, req.user_id).await?;
        let sent_at = jiff::Timestamp::now();
        let payload = PushPayload::new(
            &self.defaults,
            &req.title,
            &req.message,
            &req.notification_type,
            sent_at,
        );

        let attempts = targets.iter().filter_map(|device| {
            let subscription = device.subscription.as_ref()?;
            let payload = &payload;
            Some(async move {
                let result = self.transport.send(subscription, payload).await;
                (device.id, result)
            })
        });

        let mut ledger = DeliveryLedger::new();
        for (device_id, result) in join_all(attempts).await {
            let outcome = match result {
                Ok(()) => DeliveryOutcome::Delivered,
                Err(e) => {
                    warn!(user_id = %req.user_id, %device_id, error = %e, "push delivery failed");
                    if e.is_endpoint_gone()
                        && let Err(clear_err) =
                            devices::clear_subscription(store, device_id).await
                    {
                        warn!(%device_id, error = %clear_err, "failed to clear gone subscription");
                    }
                    DeliveryOutcome::Failed
                }
            };
            ledger.insert(device_id, outcome);
        }

        let success_count = ledger
            .values()
            .filter(|o| **o == DeliveryOutcome::Delivered)
            .count();

        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            title: req.title,
            message: req.message,
            notification_type: req.notification_type,
            devices_sent_to: u32::try_from(ledger.len()).unwrap_or(u32::MAX),
            delivery_status: ledger,
            is_read: false,
            sent_at,
            created_at: jiff::Timestamp::now(),
        };
        let notification = insert_record(store, tables::NOTIFICATIONS, &notification).await?;

        info!(
            user_id = %notification.user_id,
            notification_id = %notification.id,
            devices = notification.devices_sent_to,
            delivered = success_count,
            "notification dispatched"
        );
        self.events.publish(DispatchEvent::from(&notification));

        Ok(DispatchReport {
            success: true,
            devices_count: notification.delivery_status.len(),
            success_count,
            delivery_status: notification.delivery_status,
            notification_id: notification.id,
        })
    }
}
