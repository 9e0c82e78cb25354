use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Respondent {
    pub id: Uuid,
    /// Login account, when the respondent fills the questionnaire herself.
    pub user_id: Option<Uuid>,
    pub name: String,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub health_unit_id: Option<Uuid>,
    pub pregnancy_status: PregnancyStatus,
    pub gestational_week: Option<u32>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PregnancyStatus {
    Pregnant,
    Postpartum,
}

impl FromStr for PregnancyStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pregnant" => Ok(Self::Pregnant),
            "postpartum" => Ok(Self::Postpartum),
            other => Err(CoreError::UnknownPregnancyStatus(other.to_string())),
        }
    }
}
