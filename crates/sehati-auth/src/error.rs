use thiserror::Error;

use sehati_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("session secret must not be empty")]
    EmptySecret,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
