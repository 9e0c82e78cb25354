use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sehati_auth::error::AuthError;
use sehati_instruments::error::InstrumentError;
use sehati_instruments::scoring::ValidationError;
use sehati_push::error::PushError;
use sehati_storage::error::StorageError;

/// Unified API error type for all route handlers.
///
/// Every message a client sees is a fixed Indonesian string; underlying
/// detail only reaches the logs.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    InvalidAnswers(Vec<ValidationError>),
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(&'static str),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidAnswers(errors) => {
                details = Some(errors);
                (StatusCode::BAD_REQUEST, "Jawaban kuesioner tidak valid")
            }
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Username atau password salah")
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Sesi tidak valid atau telah berakhir",
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Anda tidak memiliki akses"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Data tidak ditemukan"),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Terjadi kesalahan pada server",
                )
            }
        };

        let body = ErrorBody {
            success: false,
            error: message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { .. } => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::Jwt(_) => {
                ApiError::Unauthorized
            }
            AuthError::UsernameTaken(_) => ApiError::Conflict("Username sudah digunakan"),
            AuthError::Storage(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PushError> for ApiError {
    fn from(e: PushError) -> Self {
        match e {
            PushError::MissingEndpoint => {
                ApiError::BadRequest("Subscription tidak memiliki endpoint")
            }
            PushError::Storage(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<InstrumentError> for ApiError {
    fn from(e: InstrumentError) -> Self {
        match e {
            InstrumentError::UnknownInstrument(_) => {
                ApiError::BadRequest("Instrumen kuesioner tidak dikenal")
            }
            InstrumentError::Validation(err) => ApiError::InvalidAnswers(vec![err]),
            InstrumentError::InvalidAnswers(errs) => ApiError::InvalidAnswers(errs),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        tracing::debug!(error = %e, "rejected request body");
        ApiError::BadRequest("Format data tidak valid")
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}
