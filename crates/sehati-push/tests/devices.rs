use serde_json::json;
use uuid::Uuid;

use sehati_push::devices::{active_devices, list_devices, subscribe, unsubscribe};
use sehati_push::error::PushError;
use sehati_storage::memory::MemoryStore;

#[tokio::test]
async fn subscribe_requires_an_endpoint() {
    let store = MemoryStore::new();
    let err = subscribe(&store, Uuid::new_v4(), json!({ "keys": {} }), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PushError::MissingEndpoint));
}

#[tokio::test]
async fn resubscribing_same_endpoint_reuses_device() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    let sub = json!({ "endpoint": "https://push/a" });

    let first = subscribe(&store, user, sub.clone(), None).await.unwrap();
    unsubscribe(&store, user, "https://push/a").await.unwrap();
    let second = subscribe(&store, user, sub, Some(json!({ "ua": "Firefox" })))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.is_active);
    assert_eq!(second.device_info, Some(json!({ "ua": "Firefox" })));
    assert_eq!(list_devices(&store, user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unsubscribe_deactivates_and_clears() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    subscribe(&store, user, json!({ "endpoint": "https://push/a" }), None)
        .await
        .unwrap();
    subscribe(&store, user, json!({ "endpoint": "https://push/b" }), None)
        .await
        .unwrap();

    let changed = unsubscribe(&store, user, "https://push/a").await.unwrap();
    assert_eq!(changed, 1);

    let active = active_devices(&store, user).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].endpoint, "https://push/b");

    let all = list_devices(&store, user).await.unwrap();
    let a = all.iter().find(|d| d.endpoint == "https://push/a").unwrap();
    assert!(!a.is_active);
    assert!(a.subscription.is_none());
}

#[tokio::test]
async fn unsubscribe_of_unknown_endpoint_changes_nothing() {
    let store = MemoryStore::new();
    let changed = unsubscribe(&store, Uuid::new_v4(), "https://push/none")
        .await
        .unwrap();
    assert_eq!(changed, 0);
}
