use thiserror::Error;

use sehati_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("subscription has no endpoint")]
    MissingEndpoint,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("push config error: {0}")]
    Config(String),
}
