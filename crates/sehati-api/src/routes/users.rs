use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use sehati_audit::{AuditAction, AuditEvent};
use sehati_auth::flows::{self, NewUser};
use sehati_auth::session::SessionClaims;
use sehati_core::models::user::{PublicUser, Role, User};
use sehati_core::tables;
use sehati_storage::records::{delete_record, get_record, select_records};
use sehati_storage::{Filter, Order};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::require_admin;
use crate::routes::Ack;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserInput {
    username: String,
    display_name: Option<String>,
    password: String,
    role: Role,
    health_unit_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UpdateUserInput {
    display_name: Option<String>,
    role: Option<Role>,
    health_unit_id: Option<Uuid>,
    password: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    require_admin(&claims)?;
    let users: Vec<User> = select_records(
        state.store(),
        tables::USERS,
        &Filter::new(),
        Some(&Order::asc("username")),
    )
    .await?;
    Ok(Json(users.iter().map(User::public).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    require_admin(&claims)?;
    let user: User = get_record(state.store(), tables::USERS, id).await?;
    Ok(Json(user.public()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> Result<Json<PublicUser>, ApiError> {
    require_admin(&claims)?;
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(ApiError::BadRequest("Username dan password wajib diisi"));
    }

    let display_name = input
        .display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| input.username.clone());
    let user = flows::register(
        state.store(),
        NewUser {
            username: input.username,
            display_name,
            password: input.password,
            role: input.role,
            health_unit_id: input.health_unit_id,
        },
    )
    .await?;

    AuditEvent::new(AuditAction::Create, "user", user.id, Some(claims.sub))
        .with_details(json!({ "role": user.role }))
        .emit();
    Ok(Json(user.public()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> Result<Json<PublicUser>, ApiError> {
    require_admin(&claims)?;

    if input.password.as_deref().is_some_and(str::is_empty) {
        return Err(ApiError::BadRequest("Password tidak boleh kosong"));
    }

    let mut changes = Map::new();
    if let Some(name) = input.display_name {
        changes.insert("display_name".to_string(), Value::String(name));
    }
    if let Some(role) = input.role {
        changes.insert("role".to_string(), serde_json::to_value(role)?);
    }
    if let Some(unit) = input.health_unit_id {
        changes.insert("health_unit_id".to_string(), Value::String(unit.to_string()));
    }

    let user =
        flows::update_account(state.store(), id, changes, input.password.as_deref()).await?;
    AuditEvent::new(AuditAction::Update, "user", id, Some(claims.sub)).emit();
    Ok(Json(user.public()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError> {
    require_admin(&claims)?;
    if id == claims.sub {
        return Err(ApiError::BadRequest("Tidak dapat menghapus akun sendiri"));
    }
    delete_record(state.store(), tables::USERS, id).await?;
    AuditEvent::new(AuditAction::Delete, "user", id, Some(claims.sub)).emit();
    Ok(Json(Ack::ok()))
}
