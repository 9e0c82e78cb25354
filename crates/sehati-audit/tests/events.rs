use serde_json::json;
use uuid::Uuid;

use sehati_audit::{AuditAction, AuditEvent};

#[test]
fn builder_sets_fields() {
    let actor = Uuid::new_v4();
    let id = Uuid::new_v4();
    let event = AuditEvent::new(AuditAction::Create, "respondent", id, Some(actor))
        .with_details(json!({ "health_unit_id": null }));

    assert_eq!(event.resource_id, id.to_string());
    assert_eq!(event.actor, Some(actor));
    assert!(event.details.is_some());
    event.emit();
}

#[test]
fn serializes_action_in_snake_case() {
    let event = AuditEvent::new(AuditAction::Unsubscribe, "device", "abc", None);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "unsubscribe");
    assert!(json["actor"].is_null());
}
