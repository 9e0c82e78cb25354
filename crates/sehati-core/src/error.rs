use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown pregnancy status: {0}")]
    UnknownPregnancyStatus(String),
}
