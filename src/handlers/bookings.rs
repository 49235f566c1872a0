use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, NewBooking, PaymentMethod, Period, ServiceType};
use crate::services::{availability, email, receipts};
use crate::state::AppState;

// POST /api/bookings
//
// Accepts plain JSON or multipart/form-data; the multipart form may carry an
// optional `receipt` file part alongside the same fields.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time_period: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Serialize)]
pub struct CreateBookingResponse {
    pub booking: Booking,
    #[serde(rename = "emailSent")]
    pub email_sent: bool,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (body, receipt) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<CreateBookingRequest>::from_request(req, &())
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        (body, None)
    };

    let receipt_path = match receipt {
        Some((filename, bytes)) => Some(
            receipts::store_receipt(&state.config.uploads_dir, filename.as_deref(), &bytes)
                .await?,
        ),
        None => None,
    };

    let fields = validate_booking(body, receipt_path)?;

    let booking = {
        let mut db = state.db.lock().unwrap();
        availability::reserve(&mut db, fields)?
    };

    // Notification failure never rolls the booking back; it only flips the
    // flag on an otherwise successful response.
    let email_sent = match booking.email.as_deref() {
        Some(to) => {
            let (subject, html) = email::confirmation_email(
                &booking,
                &state.config.business_name,
                &state.config.business_phone,
            );
            match state.email.send(to, &subject, &html).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("confirmation email for booking {} failed: {e:#}", booking.id);
                    false
                }
            }
        }
        None => false,
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            booking,
            email_sent,
        }),
    ))
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(CreateBookingRequest, Option<(Option<String>, Vec<u8>)>), AppError> {
    let mut body = CreateBookingRequest::default();
    let mut receipt = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "receipt" {
            let filename = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            if !bytes.is_empty() {
                receipt = Some((filename, bytes.to_vec()));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        match name.as_str() {
            "date" => body.date = value,
            "time_period" => body.time_period = value,
            "client_name" => body.client_name = value,
            "service_type" => body.service_type = value,
            "contact" => body.contact = value,
            "email" => body.email = Some(value),
            "address" => body.address = value,
            "payment_method" => body.payment_method = Some(value),
            _ => {}
        }
    }

    Ok((body, receipt))
}

fn validate_booking(
    body: CreateBookingRequest,
    receipt_path: Option<String>,
) -> Result<NewBooking, AppError> {
    let date = NaiveDate::parse_from_str(&body.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {}", body.date)))?;
    let period = Period::parse(&body.time_period)
        .ok_or_else(|| AppError::Validation(format!("invalid time_period: {}", body.time_period)))?;
    let service_type = ServiceType::parse(&body.service_type).ok_or_else(|| {
        AppError::Validation(format!("invalid service_type: {}", body.service_type))
    })?;
    let payment_method = match body.payment_method.as_deref() {
        None | Some("") => PaymentMethod::Cash,
        Some(s) => PaymentMethod::parse(s)
            .ok_or_else(|| AppError::Validation(format!("invalid payment_method: {s}")))?,
    };

    for (field, value) in [
        ("client_name", &body.client_name),
        ("contact", &body.contact),
        ("address", &body.address),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    Ok(NewBooking {
        date,
        period,
        client_name: body.client_name,
        service_type,
        contact: body.contact,
        email: body.email.filter(|e| !e.trim().is_empty()),
        address: body.address,
        payment_method,
        receipt_path,
    })
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(&db)?
    };
    Ok(Json(bookings))
}

// PUT /api/bookings/:id
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let status = BookingStatus::parse(&body.status)
        .ok_or_else(|| AppError::Validation(format!("invalid status: {}", body.status)))?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_booking_status(&db, &id, status)?
    };

    match updated {
        Some(booking) => Ok(Json(booking)),
        None => Err(AppError::NotFound(format!("booking {id}"))),
    }
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let mut db = state.db.lock().unwrap();
        availability::release(&mut db, &id)?;
    }

    Ok(Json(serde_json::json!({ "message": "Booking deleted successfully" })))
}
