use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use sehati_core::models::category::{AnxietyCategory, DepressionCategory};
use sehati_instruments::scoring::{AnswerRange, BandTable};
use sehati_instruments::{all_instruments, get_instrument};

use crate::error::ApiError;

#[derive(Serialize)]
pub struct InstrumentSummary {
    id: String,
    name: String,
    item_count: usize,
}

#[derive(Serialize)]
pub struct InstrumentDetail {
    id: String,
    name: String,
    item_count: usize,
    answer_range: AnswerRange,
    anxiety_items: Vec<usize>,
    depression_bands: BandTable<DepressionCategory>,
    anxiety_bands: BandTable<AnxietyCategory>,
}

pub async fn list_instruments() -> Json<Vec<InstrumentSummary>> {
    let instruments: Vec<InstrumentSummary> = all_instruments()
        .iter()
        .map(|i| InstrumentSummary {
            id: i.id().to_string(),
            name: i.name().to_string(),
            item_count: i.item_count(),
        })
        .collect();
    Json(instruments)
}

pub async fn get_instrument_detail(
    Path(id): Path<String>,
) -> Result<Json<InstrumentDetail>, ApiError> {
    let instrument = get_instrument(&id).ok_or(ApiError::NotFound)?;

    Ok(Json(InstrumentDetail {
        id: instrument.id().to_string(),
        name: instrument.name().to_string(),
        item_count: instrument.item_count(),
        answer_range: instrument.answer_range(),
        anxiety_items: instrument.anxiety_items().to_vec(),
        depression_bands: *instrument.depression_bands(),
        anxiety_bands: *instrument.anxiety_bands(),
    }))
}
