//! sehati-instruments
//!
//! Questionnaire instrument definitions and scoring. Pure data and pure
//! functions: no store, no I/O. Persisting a score is the caller's job.

pub mod error;
pub mod instruments;
pub mod scoring;

use sehati_core::models::category::{AnxietyCategory, DepressionCategory};

use error::InstrumentError;
use scoring::{AnswerRange, BandTable, Score, ValidationError};

/// Trait implemented by each questionnaire instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier (e.g., "epds").
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Number of items a complete submission answers.
    fn item_count(&self) -> usize;

    /// Range every single answer must fall in.
    fn answer_range(&self) -> AnswerRange;

    /// 0-based item positions summed into the anxiety score. Declared per
    /// instrument because it depends on that instrument's item order.
    fn anxiety_items(&self) -> &[usize];

    fn depression_bands(&self) -> &BandTable<DepressionCategory>;

    fn anxiety_bands(&self) -> &BandTable<AnxietyCategory>;

    /// Score an answer sequence. Never fails: missing items count as 0 and
    /// out-of-band totals fall through to the unknown category.
    fn score(&self, answers: &[i64]) -> Score {
        let depression_score = scoring::total(answers);
        let anxiety_score = scoring::subset_total(answers, self.anxiety_items());
        Score {
            depression_score,
            depression_category: self.depression_bands().classify(depression_score),
            anxiety_score,
            anxiety_category: self.anxiety_bands().classify(anxiety_score),
        }
    }

    /// Check a submission before it is scored and stored. A short
    /// submission is accepted (unanswered items score 0); answers beyond
    /// the last item and answers outside the range are not.
    fn validate_answers(&self, answers: &[i64]) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if answers.len() > self.item_count() {
            errors.push(ValidationError {
                position: None,
                value: None,
                message: format!(
                    "{}: at most {} answers, got {}",
                    self.name(),
                    self.item_count(),
                    answers.len(),
                ),
            });
        }

        let range = self.answer_range();
        for (position, &value) in answers.iter().enumerate() {
            if !range.contains(value) {
                errors.push(ValidationError {
                    position: Some(position),
                    value: Some(value),
                    message: format!(
                        "{}: answer {} is {}, outside [{}, {}]",
                        self.name(),
                        position + 1,
                        value,
                        range.min,
                        range.max,
                    ),
                });
            }
        }
        errors
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![Box::new(instruments::epds::Epds)]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}

/// Validate then score a submission for the instrument `id`.
pub fn score_submission(id: &str, answers: &[i64]) -> Result<Score, InstrumentError> {
    let instrument =
        get_instrument(id).ok_or_else(|| InstrumentError::UnknownInstrument(id.to_string()))?;

    let mut errors = instrument.validate_answers(answers);
    match errors.len() {
        0 => Ok(instrument.score(answers)),
        1 => Err(InstrumentError::Validation(errors.remove(0))),
        _ => Err(InstrumentError::InvalidAnswers(errors)),
    }
}
