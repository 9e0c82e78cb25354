use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use sehati_audit::{AuditAction, AuditEvent};
use sehati_auth::session::SessionClaims;
use sehati_core::models::respondent::{PregnancyStatus, Respondent};
use sehati_core::tables;
use sehati_storage::records::{
    delete_record, get_record, insert_record, replace_record, select_records,
};
use sehati_storage::{Filter, Order};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::require_admin;
use crate::routes::Ack;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RespondentQuery {
    health_unit_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct RespondentInput {
    user_id: Option<Uuid>,
    name: String,
    age: Option<u32>,
    phone: Option<String>,
    address: Option<String>,
    health_unit_id: Option<Uuid>,
    pregnancy_status: PregnancyStatus,
    gestational_week: Option<u32>,
}

impl RespondentInput {
    fn into_respondent(
        self,
        id: Uuid,
        created_at: jiff::Timestamp,
    ) -> Result<Respondent, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Nama responden wajib diisi"));
        }
        if self.gestational_week.is_some_and(|w| w > 45) {
            return Err(ApiError::BadRequest("Usia kehamilan tidak valid"));
        }
        Ok(Respondent {
            id,
            user_id: self.user_id,
            name: self.name,
            age: self.age,
            phone: self.phone,
            address: self.address,
            health_unit_id: self.health_unit_id,
            pregnancy_status: self.pregnancy_status,
            gestational_week: self.gestational_week,
            created_at,
            updated_at: jiff::Timestamp::now(),
        })
    }
}

/// Admins see every respondent; a respondent account sees only the
/// records linked to it.
pub fn can_view(claims: &SessionClaims, respondent: &Respondent) -> bool {
    claims.is_admin() || respondent.user_id == Some(claims.sub)
}

pub async fn list_respondents(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<RespondentQuery>,
) -> Result<Json<Vec<Respondent>>, ApiError> {
    let mut filter = Filter::new();
    if !claims.is_admin() {
        filter = filter.eq("user_id", claims.sub.to_string());
    }
    if let Some(unit) = query.health_unit_id {
        filter = filter.eq("health_unit_id", unit.to_string());
    }

    let respondents = select_records(
        state.store(),
        tables::RESPONDENTS,
        &filter,
        Some(&Order::asc("name")),
    )
    .await?;
    Ok(Json(respondents))
}

pub async fn get_respondent(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Respondent>, ApiError> {
    let respondent: Respondent = get_record(state.store(), tables::RESPONDENTS, id).await?;
    if !can_view(&claims, &respondent) {
        return Err(ApiError::NotFound);
    }
    Ok(Json(respondent))
}

pub async fn create_respondent(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(input): ApiJson<RespondentInput>,
) -> Result<Json<Respondent>, ApiError> {
    require_admin(&claims)?;
    let respondent = input.into_respondent(Uuid::new_v4(), jiff::Timestamp::now())?;
    let respondent = insert_record(state.store(), tables::RESPONDENTS, &respondent).await?;
    AuditEvent::new(AuditAction::Create, "respondent", respondent.id, Some(claims.sub)).emit();
    Ok(Json(respondent))
}

pub async fn update_respondent(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<RespondentInput>,
) -> Result<Json<Respondent>, ApiError> {
    require_admin(&claims)?;
    let existing: Respondent = get_record(state.store(), tables::RESPONDENTS, id).await?;
    let respondent = input.into_respondent(id, existing.created_at)?;
    let respondent = replace_record(state.store(), tables::RESPONDENTS, id, &respondent).await?;
    AuditEvent::new(AuditAction::Update, "respondent", id, Some(claims.sub)).emit();
    Ok(Json(respondent))
}

pub async fn delete_respondent(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError> {
    require_admin(&claims)?;
    delete_record(state.store(), tables::RESPONDENTS, id).await?;
    AuditEvent::new(AuditAction::Delete, "respondent", id, Some(claims.sub)).emit();
    Ok(Json(Ack::ok()))
}
