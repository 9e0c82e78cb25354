use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found: {table}/{id}")]
    NotFound { table: String, id: String },

    #[error("refusing unfiltered {op} on {table}")]
    UnfilteredWrite { op: &'static str, table: String },

    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store request error: {0}")]
    Request(String),

    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("store config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Request(e.to_string())
    }
}
