use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use sehati_core::models::device::Device;
use sehati_core::models::notification::{DeliveryOutcome, Notification};
use sehati_core::tables;
use sehati_push::devices::{list_devices, subscribe};
use sehati_push::payload::{PushDefaults, PushPayload};
use sehati_push::transport::DisabledTransport;
use sehati_push::error::PushError;
use sehati_push::{DeliveryError, DispatchRequest, Dispatcher, PushTransport};
use sehati_storage::memory::MemoryStore;
use sehati_storage::records::{get_record, select_records};
use sehati_storage::error::StorageError;
use sehati_storage::{Filter, Order, RecordStore};

/// Fails endpoints listed in `failures` with the given status, delivers to
/// everything else, and records every payload it saw.
#[derive(Default)]
struct ScriptedTransport {
    failures: HashMap<String, u16>,
    sent: Mutex<Vec<(String, PushPayload)>>,
}

impl ScriptedTransport {
    fn failing(endpoint: &str, status: u16) -> Self {
        let mut failures = HashMap::new();
        failures.insert(endpoint.to_string(), status);
        Self {
            failures,
            sent: Mutex::default(),
        }
    }
}

#[async_trait]
impl PushTransport for ScriptedTransport {
    async fn send(&self, subscription: &Value, payload: &PushPayload) -> Result<(), DeliveryError> {
        let endpoint = subscription["endpoint"].as_str().unwrap_or_default().to_string();
        self.sent
            .lock()
            .unwrap()
            .push((endpoint.clone(), payload.clone()));
        match self.failures.get(&endpoint) {
            Some(&status) => Err(DeliveryError::Rejected { status }),
            None => Ok(()),
        }
    }
}

fn subscription(endpoint: &str) -> Value {
    json!({ "endpoint": endpoint, "keys": { "p256dh": "k", "auth": "a" } })
}

async fn setup(
    transport: ScriptedTransport,
) -> (Arc<MemoryStore>, Arc<ScriptedTransport>, Dispatcher) {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(transport);
    let dispatcher = Dispatcher::new(store.clone(), transport.clone(), PushDefaults::default());
    (store, transport, dispatcher)
}

#[tokio::test]
async fn zero_devices_still_persists_notification() {
    let (store, _, dispatcher) = setup(ScriptedTransport::default()).await;
    let user = Uuid::new_v4();

    let report = dispatcher
        .dispatch(DispatchRequest::new(user, "Halo", "Pesan"))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.devices_count, 0);
    assert_eq!(report.success_count, 0);
    assert!(report.delivery_status.is_empty());

    let saved: Notification = get_record(&*store, tables::NOTIFICATIONS, report.notification_id)
        .await
        .unwrap();
    assert_eq!(saved.user_id, user);
    assert_eq!(saved.devices_sent_to, 0);
    assert_eq!(saved.notification_type, "info");
}

#[tokio::test]
async fn one_failed_device_does_not_stop_the_other() {
    let (store, _, dispatcher) = setup(ScriptedTransport::failing("https://push/b", 500)).await;
    let user = Uuid::new_v4();
    let a = subscribe(&*store, user, subscription("https://push/a"), None)
        .await
        .unwrap();
    let b = subscribe(&*store, user, subscription("https://push/b"), None)
        .await
        .unwrap();

    let report = dispatcher
        .dispatch(DispatchRequest::new(user, "Halo", "Pesan"))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.devices_count, 2);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.delivery_status[&a.id], DeliveryOutcome::Delivered);
    assert_eq!(report.delivery_status[&b.id], DeliveryOutcome::Failed);

    let b_after: Device = get_record(&*store, tables::DEVICES, b.id).await.unwrap();
    assert!(b_after.subscription.is_some(), "non-gone failure keeps the subscription");
    assert!(b_after.is_active);
}

#[tokio::test]
async fn gone_endpoint_clears_subscription_but_keeps_device() {
    let (store, transport, dispatcher) =
        setup(ScriptedTransport::failing("https://push/gone", 410)).await;
    let user = Uuid::new_v4();
    let gone = subscribe(&*store, user, subscription("https://push/gone"), None)
        .await
        .unwrap();

    let report = dispatcher
        .dispatch(DispatchRequest::new(user, "Halo", "Pesan"))
        .await
        .unwrap();
    assert_eq!(report.delivery_status[&gone.id], DeliveryOutcome::Failed);

    let after: Device = get_record(&*store, tables::DEVICES, gone.id).await.unwrap();
    assert!(after.subscription.is_none());
    assert!(after.is_active);
    assert_eq!(list_devices(&*store, user).await.unwrap().len(), 1);

    // The cleared device is skipped next time.
    let second = dispatcher
        .dispatch(DispatchRequest::new(user, "Lagi", "Pesan"))
        .await
        .unwrap();
    assert_eq!(second.devices_count, 0);
    assert_eq!(transport.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn payload_carries_defaults_and_actions() {
    let (store, transport, dispatcher) = setup(ScriptedTransport::default()).await;
    let user = Uuid::new_v4();
    subscribe(&*store, user, subscription("https://push/a"), None)
        .await
        .unwrap();

    dispatcher
        .dispatch(DispatchRequest::new(user, "Jadwal", "Kontrol besok").with_type("reminder"))
        .await
        .unwrap();

    let sent = transport.sent.lock().unwrap();
    let (_, payload) = &sent[0];
    let defaults = PushDefaults::default();
    assert_eq!(payload.title, "Jadwal");
    assert_eq!(payload.body, "Kontrol besok");
    assert_eq!(payload.icon, defaults.icon);
    assert_eq!(payload.badge, defaults.badge);
    assert_eq!(payload.vibrate, defaults.vibrate);
    assert_eq!(payload.data.url, defaults.url);
    assert_eq!(payload.data.notification_type, "reminder");
    let actions: Vec<_> = payload.actions.iter().map(|a| a.action.as_str()).collect();
    assert_eq!(actions, ["open", "dismiss"]);
}

#[tokio::test]
async fn other_users_devices_are_not_targeted() {
    let (store, transport, dispatcher) = setup(ScriptedTransport::default()).await;
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();
    subscribe(&*store, other, subscription("https://push/other"), None)
        .await
        .unwrap();

    let report = dispatcher
        .dispatch(DispatchRequest::new(user, "Halo", "Pesan"))
        .await
        .unwrap();
    assert_eq!(report.devices_count, 0);
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn disabled_transport_records_failures() {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = Dispatcher::new(
        store.clone(),
        Arc::new(DisabledTransport),
        PushDefaults::default(),
    );
    let user = Uuid::new_v4();
    subscribe(&*store, user, subscription("https://push/a"), None)
        .await
        .unwrap();

    let report = dispatcher
        .dispatch(DispatchRequest::new(user, "Halo", "Pesan"))
        .await
        .unwrap();
    assert!(report.success);
    assert_eq!(report.success_count, 0);
    assert_eq!(report.devices_count, 1);

    let saved: Vec<Notification> = select_records(
        &*store,
        tables::NOTIFICATIONS,
        &Filter::new().eq("user_id", user.to_string()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(saved.len(), 1);
}

#[tokio::test]
async fn completed_dispatch_is_published() {
    let (_, _, dispatcher) = setup(ScriptedTransport::default()).await;
    let mut events = dispatcher.events().subscribe();
    let user = Uuid::new_v4();

    let report = dispatcher
        .dispatch(DispatchRequest::new(user, "Halo", "Pesan"))
        .await
        .unwrap();

    let event = events.try_recv().unwrap();
    assert_eq!(event.notification_id, report.notification_id);
    assert_eq!(event.user_id, user);
    assert_eq!(event.title, "Halo");
}

/// Memory store that refuses selects or inserts on one table.
struct FaultyStore {
    inner: MemoryStore,
    fail_select: Option<&'static str>,
    fail_insert: Option<&'static str>,
}

impl FaultyStore {
    fn outage(table: &str) -> StorageError {
        StorageError::Request(format!("{table} unavailable"))
    }
}

#[async_trait]
impl RecordStore for FaultyStore {
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StorageError> {
        if self.fail_insert == Some(table) {
            return Err(Self::outage(table));
        }
        self.inner.insert(table, record).await
    }

    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StorageError> {
        if self.fail_select == Some(table) {
            return Err(Self::outage(table));
        }
        self.inner.select(table, filter, order).await
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> Result<Vec<Value>, StorageError> {
        self.inner.update(table, patch, filter).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StorageError> {
        self.inner.delete(table, filter).await
    }
}

#[tokio::test]
async fn unreadable_devices_fail_the_dispatch() {
    let store = Arc::new(FaultyStore {
        inner: MemoryStore::new(),
        fail_select: Some(tables::DEVICES),
        fail_insert: None,
    });
    let transport = Arc::new(ScriptedTransport::default());
    let dispatcher = Dispatcher::new(store.clone(), transport.clone(), PushDefaults::default());

    let err = dispatcher
        .dispatch(DispatchRequest::new(Uuid::new_v4(), "Halo", "Pesan"))
        .await
        .unwrap_err();

    assert!(matches!(err, PushError::Storage(_)));
    assert!(transport.sent.lock().unwrap().is_empty());
    assert_eq!(store.inner.len(tables::NOTIFICATIONS).await, 0);
}

#[tokio::test]
async fn unsaved_notification_fails_the_dispatch() {
    let store = Arc::new(FaultyStore {
        inner: MemoryStore::new(),
        fail_select: None,
        fail_insert: Some(tables::NOTIFICATIONS),
    });
    let user = Uuid::new_v4();
    subscribe(&store.inner, user, subscription("https://push/a"), None)
        .await
        .unwrap();

    let transport = Arc::new(ScriptedTransport::default());
    let dispatcher = Dispatcher::new(store.clone(), transport.clone(), PushDefaults::default());
    let mut events = dispatcher.events().subscribe();

    let err = dispatcher
        .dispatch(DispatchRequest::new(user, "Halo", "Pesan"))
        .await
        .unwrap_err();

    assert!(matches!(err, PushError::Storage(_)));
    assert_eq!(transport.sent.lock().unwrap().len(), 1);
    assert!(events.try_recv().is_none());
}
