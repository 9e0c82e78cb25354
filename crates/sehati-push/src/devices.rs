use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use sehati_core::models::device::Device;
use sehati_core::tables;
use sehati_storage::records::{find_record, insert_record, select_records, update_record};
use sehati_storage::{Filter, RecordStore};

use crate::error::PushError;

/// The endpoint URL inside a browser push subscription.
pub fn endpoint_of(subscription: &Value) -> Option<&str> {
    subscription
        .get("endpoint")
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty())
}

/// Register a subscription for `user_id`.
///
/// A subscription whose endpoint is already known for this user refreshes
/// and reactivates that device instead of adding a second one.
pub async fn subscribe(
    store: &dyn RecordStore,
    user_id: Uuid,
    subscription: Value,
    device_info: Option<Value>,
) -> Result<Device, PushError> {
    let endpoint = endpoint_of(&subscription)
        .ok_or(PushError::MissingEndpoint)?
        .to_string();
    let now = jiff::Timestamp::now();

    let existing: Option<Device> = find_record(
        store,
        tables::DEVICES,
        &Filter::new()
            .eq("user_id", user_id.to_string())
            .eq("endpoint", endpoint.as_str()),
    )
    .await?;

    if let Some(device) = existing {
        let patch = json!({
            "subscription": subscription,
            "device_info": device_info,
            "is_active": true,
            "updated_at": now,
        });
        let device: Device = update_record(store, tables::DEVICES, device.id, patch).await?;
        info!(%user_id, device_id = %device.id, "device resubscribed");
        return Ok(device);
    }

    let device = Device {
        id: Uuid::new_v4(),
        user_id,
        endpoint,
        is_active: true,
        subscription: Some(subscription),
        device_info,
        created_at: now,
        updated_at: now,
    };
    let device = insert_record(store, tables::DEVICES, &device).await?;
    info!(%user_id, device_id = %device.id, "device subscribed");
    Ok(device)
}

/// Deactivate the user's device registered under `endpoint` and drop its
/// subscription. Returns how many devices changed.
pub async fn unsubscribe(
    store: &dyn RecordStore,
    user_id: Uuid,
    endpoint: &str,
) -> Result<usize, PushError> {
    let patch = json!({
        "is_active": false,
        "subscription": null,
        "updated_at": jiff::Timestamp::now(),
    });
    let updated = store
        .update(
            tables::DEVICES,
            patch,
            &Filter::new()
                .eq("user_id", user_id.to_string())
                .eq("endpoint", endpoint),
        )
        .await?;
    info!(%user_id, count = updated.len(), "device unsubscribed");
    Ok(updated.len())
}

/// Devices of `user_id` that can currently receive pushes.
pub async fn active_devices(
    store: &dyn RecordStore,
    user_id: Uuid,
) -> Result<Vec<Device>, PushError> {
    let devices: Vec<Device> = select_records(
        store,
        tables::DEVICES,
        &Filter::new()
            .eq("user_id", user_id.to_string())
            .eq("is_active", true)
            .not_null("subscription"),
        None,
    )
    .await?;
    Ok(devices.into_iter().filter(Device::is_deliverable).collect())
}

/// All devices of `user_id`, deliverable or not.
pub async fn list_devices(
    store: &dyn RecordStore,
    user_id: Uuid,
) -> Result<Vec<Device>, PushError> {
    Ok(select_records(
        store,
        tables::DEVICES,
        &Filter::new().eq("user_id", user_id.to_string()),
        None,
    )
    .await?)
}

/// Forget a device's subscription after the push service reported its
/// endpoint gone. The device record itself stays.
pub async fn clear_subscription(
    store: &dyn RecordStore,
    device_id: Uuid,
) -> Result<(), PushError> {
    let patch = json!({
        "subscription": null,
        "updated_at": jiff::Timestamp::now(),
    });
    let _: Device = update_record(store, tables::DEVICES, device_id, patch).await?;
    Ok(())
}
