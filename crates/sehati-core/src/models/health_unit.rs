use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A community health unit (puskesmas) that respondents and staff belong to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthUnit {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub district: Option<String>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}
