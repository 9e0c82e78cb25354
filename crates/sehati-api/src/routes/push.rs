//! `/api/push/*`: device subscription and manual dispatch.
//!
//! Bodies are camelCase and every answer carries `success`, matching what
//! the service worker registration code sends and expects.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use sehati_audit::{AuditAction, AuditEvent};
use sehati_auth::session::SessionClaims;
use sehati_push::dispatch::DEFAULT_NOTIFICATION_TYPE;
use sehati_push::{devices, DispatchReport, DispatchRequest};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::{require_admin, require_self_or_admin};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    user_id: Option<Uuid>,
    title: Option<String>,
    message: Option<String>,
    #[serde(rename = "type")]
    notification_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    user_id: Option<Uuid>,
    subscription: Option<Value>,
    device_info: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    user_id: Option<Uuid>,
    endpoint: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    success: bool,
    device_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeResponse {
    success: bool,
    devices_updated: usize,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn send(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(body): ApiJson<SendRequest>,
) -> Result<Json<DispatchReport>, ApiError> {
    require_admin(&claims)?;
    let (Some(user_id), Some(title), Some(message)) =
        (body.user_id, non_empty(body.title), non_empty(body.message))
    else {
        return Err(ApiError::BadRequest("userId, title, dan message wajib diisi"));
    };
    let notification_type = non_empty(body.notification_type)
        .unwrap_or_else(|| DEFAULT_NOTIFICATION_TYPE.to_string());

    let report = state
        .dispatcher
        .dispatch(DispatchRequest::new(user_id, title, message).with_type(notification_type))
        .await?;

    AuditEvent::new(
        AuditAction::Dispatch,
        "notification",
        report.notification_id,
        Some(claims.sub),
    )
    .with_details(serde_json::json!({
        "user_id": user_id,
        "devices": report.devices_count,
        "delivered": report.success_count,
    }))
    .emit();
    Ok(Json(report))
}

pub async fn subscribe(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(body): ApiJson<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let (Some(user_id), Some(subscription)) = (body.user_id, body.subscription) else {
        return Err(ApiError::BadRequest("userId dan subscription wajib diisi"));
    };
    require_self_or_admin(&claims, user_id)?;

    let device =
        devices::subscribe(state.store(), user_id, subscription, body.device_info).await?;
    AuditEvent::new(AuditAction::Subscribe, "device", device.id, Some(claims.sub)).emit();
    Ok(Json(SubscribeResponse {
        success: true,
        device_id: device.id,
    }))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(body): ApiJson<UnsubscribeRequest>,
) -> Result<Json<UnsubscribeResponse>, ApiError> {
    let (Some(user_id), Some(endpoint)) = (body.user_id, non_empty(body.endpoint)) else {
        return Err(ApiError::BadRequest("userId dan endpoint wajib diisi"));
    };
    require_self_or_admin(&claims, user_id)?;

    let devices_updated = devices::unsubscribe(state.store(), user_id, &endpoint).await?;
    AuditEvent::new(AuditAction::Unsubscribe, "device", &endpoint, Some(claims.sub)).emit();
    Ok(Json(UnsubscribeResponse {
        success: true,
        devices_updated,
    }))
}
