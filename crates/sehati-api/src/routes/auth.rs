use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use sehati_audit::{AuditAction, AuditEvent};
use sehati_auth::flows;
use sehati_auth::session::SessionClaims;
use sehati_core::models::user::PublicUser;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    success: bool,
    token: String,
    expires_at: jiff::Timestamp,
    user: PublicUser,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(ApiError::BadRequest("Username dan password wajib diisi"));
    };

    let outcome = flows::login(state.store(), &state.sessions, &username, &password).await;
    let (user, issued) = match outcome {
        Ok(ok) => ok,
        Err(e) => {
            AuditEvent::new(AuditAction::Login, "session", &username, None)
                .with_details(serde_json::json!({ "outcome": "rejected" }))
                .emit();
            return Err(e.into());
        }
    };
    AuditEvent::new(AuditAction::Login, "session", user.id, Some(user.id)).emit();

    let cookie = format!(
        "{SESSION_COOKIE}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        issued.token,
        state.sessions.ttl().as_secs()
    );
    let cookie =
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))?;

    let body = LoginResponse {
        success: true,
        token: issued.token,
        expires_at: issued.expires_at,
        user: user.public(),
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

pub async fn me(Extension(claims): Extension<SessionClaims>) -> Json<SessionClaims> {
    Json(claims)
}
