use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use sehati_audit::{AuditAction, AuditEvent};
use sehati_auth::session::SessionClaims;
use sehati_core::models::question::{AnswerOption, Question};
use sehati_core::tables;
use sehati_storage::records::{delete_record, insert_record, replace_record, select_records};
use sehati_storage::{Filter, Order};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::require_admin;
use crate::routes::Ack;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct QuestionQuery {
    instrument_id: Option<String>,
}

#[derive(Deserialize)]
pub struct QuestionInput {
    #[serde(default = "default_instrument")]
    instrument_id: String,
    position: u32,
    text: String,
    options: Vec<AnswerOption>,
}

fn default_instrument() -> String {
    "epds".to_string()
}

impl QuestionInput {
    fn into_question(self, id: Uuid) -> Result<Question, ApiError> {
        if self.text.trim().is_empty() || self.options.is_empty() {
            return Err(ApiError::BadRequest("Teks dan pilihan jawaban wajib diisi"));
        }
        Ok(Question {
            id,
            instrument_id: self.instrument_id,
            position: self.position,
            text: self.text,
            options: self.options,
        })
    }
}

pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionQuery>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let filter = match query.instrument_id {
        Some(id) => Filter::new().eq("instrument_id", id),
        None => Filter::new(),
    };
    let questions = select_records(
        state.store(),
        tables::QUESTIONS,
        &filter,
        Some(&Order::asc("position")),
    )
    .await?;
    Ok(Json(questions))
}

pub async fn create_question(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(input): ApiJson<QuestionInput>,
) -> Result<Json<Question>, ApiError> {
    require_admin(&claims)?;
    let question = input.into_question(Uuid::new_v4())?;
    let question = insert_record(state.store(), tables::QUESTIONS, &question).await?;
    AuditEvent::new(AuditAction::Create, "question", question.id, Some(claims.sub)).emit();
    Ok(Json(question))
}

pub async fn update_question(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<QuestionInput>,
) -> Result<Json<Question>, ApiError> {
    require_admin(&claims)?;
    let question = input.into_question(id)?;
    let question = replace_record(state.store(), tables::QUESTIONS, id, &question).await?;
    AuditEvent::new(AuditAction::Update, "question", id, Some(claims.sub)).emit();
    Ok(Json(question))
}

pub async fn delete_question(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError> {
    require_admin(&claims)?;
    delete_record(state.store(), tables::QUESTIONS, id).await?;
    AuditEvent::new(AuditAction::Delete, "question", id, Some(claims.sub)).emit();
    Ok(Json(Ack::ok()))
}
