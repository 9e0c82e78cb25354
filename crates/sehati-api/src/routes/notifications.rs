use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{Extension, Json};
use futures::{Stream, StreamExt};
use serde_json::json;
use uuid::Uuid;

use sehati_auth::session::SessionClaims;
use sehati_core::models::notification::Notification;
use sehati_core::tables;
use sehati_storage::records::{get_record, select_records, update_record};
use sehati_storage::{Filter, Order};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = select_records(
        state.store(),
        tables::NOTIFICATIONS,
        &Filter::new().eq("user_id", claims.sub.to_string()),
        Some(&Order::desc("sent_at")),
    )
    .await?;
    Ok(Json(notifications))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let notification: Notification = get_record(state.store(), tables::NOTIFICATIONS, id).await?;
    if notification.user_id != claims.sub {
        return Err(ApiError::NotFound);
    }
    let patch = json!({ "is_read": true });
    let notification = update_record(state.store(), tables::NOTIFICATIONS, id, patch).await?;
    Ok(Json(notification))
}

/// Server-sent stream of dispatches addressed to the caller. The bus
/// subscription lives exactly as long as the connection.
pub async fn events(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = claims.sub;
    let stream = state
        .dispatcher
        .events()
        .subscribe()
        .into_stream()
        .filter(move |event| futures::future::ready(event.user_id == user_id))
        .map(|event| {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Ok(Event::default().event("notification").data(data))
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
