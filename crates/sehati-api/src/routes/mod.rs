pub mod auth;
pub mod health;
pub mod health_units;
pub mod instruments;
pub mod notifications;
pub mod push;
pub mod questions;
pub mod respondents;
pub mod responses;
pub mod users;

use serde::Serialize;

/// Body of routes that only report success, e.g. deletes.
#[derive(Debug, Serialize)]
pub struct Ack {
    success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
