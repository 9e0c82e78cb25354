use std::collections::BTreeMap;

use sehati_core::models::category::{AnxietyCategory, DepressionCategory};
use sehati_core::models::device::Device;
use sehati_core::models::notification::{DeliveryOutcome, Notification};
use sehati_core::models::user::Role;
use uuid::Uuid;

#[test]
fn categories_serialize_to_indonesian_labels() {
    assert_eq!(
        serde_json::to_string(&DepressionCategory::VeryMild).unwrap(),
        "\"Sangat Ringan\""
    );
    assert_eq!(
        serde_json::to_string(&AnxietyCategory::MildToModerate).unwrap(),
        "\"Ringan hingga Sedang\""
    );
    let parsed: DepressionCategory = serde_json::from_str("\"Tidak Diketahui\"").unwrap();
    assert_eq!(parsed, DepressionCategory::Unknown);
}

#[test]
fn display_matches_serialized_label() {
    assert_eq!(DepressionCategory::ModerateSevere.to_string(), "Sedang-Berat");
    assert_eq!(AnxietyCategory::Severe.to_string(), "Berat");
}

#[test]
fn high_risk_bands() {
    assert!(DepressionCategory::Severe.is_high_risk());
    assert!(DepressionCategory::ModerateSevere.is_high_risk());
    assert!(!DepressionCategory::MildModerate.is_high_risk());
    assert!(!DepressionCategory::Unknown.is_high_risk());
    assert!(AnxietyCategory::Severe.is_high_risk());
    assert!(!AnxietyCategory::MildToModerate.is_high_risk());
}

#[test]
fn role_parses_from_wire_names() {
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!("respondent".parse::<Role>().unwrap(), Role::Respondent);
    assert!("root".parse::<Role>().is_err());
}

#[test]
fn device_without_subscription_is_not_deliverable() {
    let now = jiff::Timestamp::now();
    let mut device = Device {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        endpoint: "https://push.example/abc".to_string(),
        is_active: true,
        subscription: Some(serde_json::json!({ "endpoint": "https://push.example/abc" })),
        device_info: None,
        created_at: now,
        updated_at: now,
    };
    assert!(device.is_deliverable());

    device.subscription = None;
    assert!(!device.is_deliverable());

    device.subscription = Some(serde_json::json!({}));
    device.is_active = false;
    assert!(!device.is_deliverable());
}

#[test]
fn notification_ledger_serializes_outcomes_in_snake_case() {
    let now = jiff::Timestamp::now();
    let delivered = Uuid::new_v4();
    let failed = Uuid::new_v4();
    let mut ledger = BTreeMap::new();
    ledger.insert(delivered, DeliveryOutcome::Delivered);
    ledger.insert(failed, DeliveryOutcome::Failed);

    let notification = Notification {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: "Pengingat".to_string(),
        message: "Isi kuesioner minggu ini".to_string(),
        notification_type: "info".to_string(),
        devices_sent_to: 2,
        delivery_status: ledger,
        is_read: false,
        sent_at: now,
        created_at: now,
    };
    assert_eq!(notification.success_count(), 1);

    let json = serde_json::to_value(&notification).unwrap();
    assert_eq!(json["delivery_status"][delivered.to_string()], "delivered");
    assert_eq!(json["delivery_status"][failed.to_string()], "failed");
}
