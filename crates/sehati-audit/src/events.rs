use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// What happened to the audited resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Submit,
    Dispatch,
    Subscribe,
    Unsubscribe,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
            AuditAction::Submit => "submit",
            AuditAction::Dispatch => "dispatch",
            AuditAction::Subscribe => "subscribe",
            AuditAction::Unsubscribe => "unsubscribe",
        }
    }
}

/// A structured audit event for logging API actions.
///
/// Emitted through `tracing` under the `audit` target so the log pipeline
/// can route it separately from request logs.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    /// Acting user; `None` before a session exists (e.g. failed login).
    pub actor: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl ToString,
        actor: Option<Uuid>,
    ) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.to_string(),
            actor,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let actor = self.actor.map(|a| a.to_string()).unwrap_or_default();
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            target: "audit",
            action = self.action.as_str(),
            resource_type = %self.resource_type,
            resource_id = %self.resource_id,
            actor = %actor,
            details = %details,
            "audit event"
        );
    }
}
