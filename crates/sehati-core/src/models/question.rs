use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A questionnaire item as shown to respondents.
///
/// `position` is the 0-based index of this item's answer in a submitted
/// answer sequence.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: Uuid,
    pub instrument_id: String,
    pub position: u32,
    pub text: String,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerOption {
    pub label: String,
    pub score: i64,
}
