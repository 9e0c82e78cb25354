use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use sehati_audit::{AuditAction, AuditEvent};
use sehati_auth::session::SessionClaims;
use sehati_core::models::respondent::Respondent;
use sehati_core::models::response::QuestionnaireResponse;
use sehati_core::models::user::{Role, User};
use sehati_core::tables;
use sehati_instruments::score_submission;
use sehati_push::DispatchRequest;
use sehati_storage::records::{get_record, insert_record, select_records};
use sehati_storage::{Filter, Order};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::routes::respondents::can_view;
use crate::state::AppState;

pub const ALERT_NOTIFICATION_TYPE: &str = "alert";

#[derive(Deserialize)]
pub struct SubmitInput {
    respondent_id: Option<Uuid>,
    #[serde(default = "default_instrument")]
    instrument_id: String,
    answers: Option<Vec<i64>>,
}

fn default_instrument() -> String {
    "epds".to_string()
}

#[derive(Deserialize)]
pub struct ResponseQuery {
    #[serde(alias = "respondentId")]
    respondent_id: Option<Uuid>,
}

pub async fn submit_response(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(input): ApiJson<SubmitInput>,
) -> Result<Json<QuestionnaireResponse>, ApiError> {
    let (Some(respondent_id), Some(answers)) = (input.respondent_id, input.answers) else {
        return Err(ApiError::BadRequest("Responden dan jawaban wajib diisi"));
    };

    let respondent: Respondent =
        get_record(state.store(), tables::RESPONDENTS, respondent_id).await?;
    if !can_view(&claims, &respondent) {
        return Err(ApiError::NotFound);
    }

    let score = score_submission(&input.instrument_id, &answers)?;
    let response = QuestionnaireResponse {
        id: Uuid::new_v4(),
        respondent_id,
        instrument_id: input.instrument_id,
        answers,
        depression_score: score.depression_score,
        depression_category: score.depression_category,
        anxiety_score: score.anxiety_score,
        anxiety_category: score.anxiety_category,
        submitted_at: jiff::Timestamp::now(),
    };
    let response = insert_record(state.store(), tables::RESPONSES, &response).await?;

    AuditEvent::new(AuditAction::Submit, "response", response.id, Some(claims.sub))
        .with_details(serde_json::json!({
            "respondent_id": respondent_id,
            "depression_category": response.depression_category,
            "anxiety_category": response.anxiety_category,
        }))
        .emit();

    if response.is_high_risk() {
        alert_health_unit(&state, &respondent, &response).await;
    }

    Ok(Json(response))
}

/// Notify every admin of the respondent's health unit about a high-risk
/// result. Failures are logged; the submission already succeeded.
async fn alert_health_unit(
    state: &AppState,
    respondent: &Respondent,
    response: &QuestionnaireResponse,
) {
    let Some(unit_id) = respondent.health_unit_id else {
        info!(respondent_id = %respondent.id, "high-risk result without health unit");
        return;
    };

    let admins: Vec<User> = match select_records(
        state.store(),
        tables::USERS,
        &Filter::new()
            .eq("role", Role::Admin.as_str())
            .eq("health_unit_id", unit_id.to_string()),
        None,
    )
    .await
    {
        Ok(admins) => admins,
        Err(e) => {
            warn!(error = %e, %unit_id, "could not load health unit admins");
            return;
        }
    };

    let message = format!(
        "{}: depresi {} ({}), kecemasan {} ({})",
        respondent.name,
        response.depression_category,
        response.depression_score,
        response.anxiety_category,
        response.anxiety_score,
    );
    for admin in admins {
        let req = DispatchRequest::new(admin.id, "Hasil skrining berisiko tinggi", &message)
            .with_type(ALERT_NOTIFICATION_TYPE);
        if let Err(e) = state.dispatcher.dispatch(req).await {
            warn!(error = %e, admin_id = %admin.id, "high-risk alert dispatch failed");
        }
    }
}

pub async fn list_responses(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<ResponseQuery>,
) -> Result<Json<Vec<QuestionnaireResponse>>, ApiError> {
    let order = Order::desc("submitted_at");

    if claims.is_admin() {
        let filter = match query.respondent_id {
            Some(id) => Filter::new().eq("respondent_id", id.to_string()),
            None => Filter::new(),
        };
        let responses =
            select_records(state.store(), tables::RESPONSES, &filter, Some(&order)).await?;
        return Ok(Json(responses));
    }

    let owned: Vec<Respondent> = select_records(
        state.store(),
        tables::RESPONDENTS,
        &Filter::new().eq("user_id", claims.sub.to_string()),
        None,
    )
    .await?;

    let mut responses = Vec::new();
    for respondent in owned
        .iter()
        .filter(|r| query.respondent_id.is_none_or(|id| id == r.id))
    {
        let mut batch: Vec<QuestionnaireResponse> = select_records(
            state.store(),
            tables::RESPONSES,
            &Filter::new().eq("respondent_id", respondent.id.to_string()),
            None,
        )
        .await?;
        responses.append(&mut batch);
    }
    responses.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    Ok(Json(responses))
}

pub async fn get_response(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionnaireResponse>, ApiError> {
    let response: QuestionnaireResponse = get_record(state.store(), tables::RESPONSES, id).await?;
    if !claims.is_admin() {
        let respondent: Respondent =
            get_record(state.store(), tables::RESPONDENTS, response.respondent_id).await?;
        if !can_view(&claims, &respondent) {
            return Err(ApiError::NotFound);
        }
    }
    Ok(Json(response))
}
