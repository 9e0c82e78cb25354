use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use sehati_core::models::category::{AnxietyCategory, DepressionCategory};

/// One row of a band table: scores in `min..=max` map to `category`.
/// `max: None` leaves the band open-ended.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Band<C> {
    pub min: i64,
    pub max: Option<i64>,
    pub category: C,
}

impl<C> Band<C> {
    pub fn contains(&self, score: i64) -> bool {
        score >= self.min && self.max.is_none_or(|max| score <= max)
    }
}

/// Ordered bands tested first to last, with a terminal fallback for scores
/// no band covers. Lookup is total.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BandTable<C: 'static> {
    pub bands: &'static [Band<C>],
    pub fallback: C,
}

impl<C: Copy> BandTable<C> {
    pub fn classify(&self, score: i64) -> C {
        self.bands
            .iter()
            .find(|b| b.contains(score))
            .map(|b| b.category)
            .unwrap_or(self.fallback)
    }
}

/// Inclusive range a single answer may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerRange {
    pub min: i64,
    pub max: i64,
}

impl AnswerRange {
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Scores and bands computed from one answer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Score {
    pub depression_score: i64,
    pub depression_category: DepressionCategory,
    pub anxiety_score: i64,
    pub anxiety_category: AnxietyCategory,
}

/// Sum of every answer.
pub fn total(answers: &[i64]) -> i64 {
    answers.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
}

/// Sum of the answers at `positions`. A position past the end counts as 0.
pub fn subset_total(answers: &[i64], positions: &[usize]) -> i64 {
    positions
        .iter()
        .map(|&i| answers.get(i).copied().unwrap_or(0))
        .fold(0i64, |acc, v| acc.saturating_add(v))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    /// Offending answer index; `None` for whole-sequence problems.
    pub position: Option<usize>,
    pub value: Option<i64>,
    pub message: String,
}
