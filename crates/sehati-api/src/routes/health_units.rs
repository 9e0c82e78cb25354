use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use sehati_audit::{AuditAction, AuditEvent};
use sehati_auth::session::SessionClaims;
use sehati_core::models::health_unit::HealthUnit;
use sehati_core::tables;
use sehati_storage::records::{
    delete_record, get_record, insert_record, select_records, update_record,
};
use sehati_storage::{Filter, Order};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::require_admin;
use crate::routes::Ack;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct HealthUnitInput {
    name: String,
    address: Option<String>,
    district: Option<String>,
}

pub async fn list_health_units(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<HealthUnit>>, ApiError> {
    require_admin(&claims)?;
    let units = select_records(
        state.store(),
        tables::HEALTH_UNITS,
        &Filter::new(),
        Some(&Order::asc("name")),
    )
    .await?;
    Ok(Json(units))
}

pub async fn get_health_unit(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<HealthUnit>, ApiError> {
    require_admin(&claims)?;
    Ok(Json(get_record(state.store(), tables::HEALTH_UNITS, id).await?))
}

pub async fn create_health_unit(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(input): ApiJson<HealthUnitInput>,
) -> Result<Json<HealthUnit>, ApiError> {
    require_admin(&claims)?;
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Nama puskesmas wajib diisi"));
    }

    let now = jiff::Timestamp::now();
    let unit = HealthUnit {
        id: Uuid::new_v4(),
        name: input.name,
        address: input.address,
        district: input.district,
        created_at: now,
        updated_at: now,
    };
    let unit = insert_record(state.store(), tables::HEALTH_UNITS, &unit).await?;
    AuditEvent::new(AuditAction::Create, "health_unit", unit.id, Some(claims.sub)).emit();
    Ok(Json(unit))
}

pub async fn update_health_unit(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<HealthUnitInput>,
) -> Result<Json<HealthUnit>, ApiError> {
    require_admin(&claims)?;
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Nama puskesmas wajib diisi"));
    }

    let patch = json!({
        "name": input.name,
        "address": input.address,
        "district": input.district,
        "updated_at": jiff::Timestamp::now(),
    });
    let unit = update_record(state.store(), tables::HEALTH_UNITS, id, patch).await?;
    AuditEvent::new(AuditAction::Update, "health_unit", id, Some(claims.sub)).emit();
    Ok(Json(unit))
}

pub async fn delete_health_unit(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError> {
    require_admin(&claims)?;
    delete_record(state.store(), tables::HEALTH_UNITS, id).await?;
    AuditEvent::new(AuditAction::Delete, "health_unit", id, Some(claims.sub)).emit();
    Ok(Json(Ack::ok()))
}
