use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::category::{AnxietyCategory, DepressionCategory};

/// A scored questionnaire submission. Immutable once stored.
///
/// `depression_score` is the total score and always equals the sum of
/// `answers`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireResponse {
    pub id: Uuid,
    pub respondent_id: Uuid,
    pub instrument_id: String,
    pub answers: Vec<i64>,
    pub depression_score: i64,
    pub depression_category: DepressionCategory,
    pub anxiety_score: i64,
    pub anxiety_category: AnxietyCategory,
    pub submitted_at: jiff::Timestamp,
}

impl QuestionnaireResponse {
    pub fn is_high_risk(&self) -> bool {
        self.depression_category.is_high_risk() || self.anxiety_category.is_high_risk()
    }
}
