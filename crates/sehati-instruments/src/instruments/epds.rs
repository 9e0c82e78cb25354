use sehati_core::models::category::{AnxietyCategory, DepressionCategory};

use crate::scoring::{AnswerRange, Band, BandTable};
use crate::Instrument;

/// EPDS: Edinburgh Postnatal Depression Scale.
/// Ten items, each answered 0–3. Items 3–5 (0-based 2, 3, 4) form the
/// anxiety subscale (EPDS-3A).
pub struct Epds;

static DEPRESSION_BANDS: BandTable<DepressionCategory> = BandTable {
    bands: &[
        Band { min: 0, max: Some(9), category: DepressionCategory::VeryMild },
        Band { min: 10, max: Some(12), category: DepressionCategory::MildModerate },
        Band { min: 13, max: Some(20), category: DepressionCategory::ModerateSevere },
        Band { min: 21, max: None, category: DepressionCategory::Severe },
    ],
    fallback: DepressionCategory::Unknown,
};

static ANXIETY_BANDS: BandTable<AnxietyCategory> = BandTable {
    bands: &[
        Band { min: 0, max: Some(3), category: AnxietyCategory::NoneOrMild },
        Band { min: 4, max: Some(6), category: AnxietyCategory::MildToModerate },
        Band { min: 7, max: Some(9), category: AnxietyCategory::Severe },
    ],
    fallback: AnxietyCategory::Unknown,
};

impl Instrument for Epds {
    fn id(&self) -> &str {
        "epds"
    }

    fn name(&self) -> &str {
        "EPDS"
    }

    fn item_count(&self) -> usize {
        10
    }

    fn answer_range(&self) -> AnswerRange {
        AnswerRange { min: 0, max: 3 }
    }

    fn anxiety_items(&self) -> &[usize] {
        &[2, 3, 4]
    }

    fn depression_bands(&self) -> &BandTable<DepressionCategory> {
        &DEPRESSION_BANDS
    }

    fn anxiety_bands(&self) -> &BandTable<AnxietyCategory> {
        &ANXIETY_BANDS
    }
}
