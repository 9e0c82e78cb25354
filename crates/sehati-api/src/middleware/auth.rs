use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use sehati_auth::session::SessionClaims;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sehati_session";

/// Session validation middleware.
///
/// Accepts `Authorization: Bearer <token>` or the session cookie, verifies
/// the token, and inserts its [`SessionClaims`] into request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers()).ok_or(ApiError::Unauthorized)?;
    let claims = state.sessions.validate(&token).map_err(|e| {
        tracing::debug!(error = %e, "session rejected");
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn require_admin(claims: &SessionClaims) -> Result<(), ApiError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Admins act on anyone; everybody else only on themselves.
pub fn require_self_or_admin(claims: &SessionClaims, user_id: Uuid) -> Result<(), ApiError> {
    if claims.is_admin() || claims.sub == user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
