use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::DayAvailability;
use crate::services::availability;
use crate::state::AppState;

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {s}")))
}

// GET /api/slots/:date
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<DayAvailability>, AppError> {
    let date = parse_date(&date)?;

    let avail = {
        let db = state.db.lock().unwrap();
        availability::get_availability(&db, date)?
    };

    Ok(Json(avail))
}

// PUT /api/slots/:date
#[derive(Deserialize)]
pub struct UpdateSlotsRequest {
    pub morning: i64,
    pub afternoon: i64,
}

pub async fn update_slots(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Json(body): Json<UpdateSlotsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = parse_date(&date)?;

    {
        let mut db = state.db.lock().unwrap();
        availability::override_capacity(&mut db, date, body.morning, body.afternoon)?;
    }

    Ok(Json(serde_json::json!({ "message": "Slots updated successfully" })))
}
