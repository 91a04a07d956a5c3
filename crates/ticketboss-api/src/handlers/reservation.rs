//! Reservation handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use crate::dto::request::{CreateReservationRequest, validation_message};
use crate::dto::response::{ReservationResponse, SummaryResponse};
use crate::error::ApiError;
use crate::extractors::parse_reservation_id;
use crate::state::AppState;

/// POST /reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    req.validate()
        .map_err(|e| ApiError::bad_request(validation_message(&e)))?;

    let created = state.register.create(&req.partner_id, req.seats).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// DELETE /reservations/{reservation_id}
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let reservation_id = parse_reservation_id(&reservation_id)?;
    state.register.cancel(&reservation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /reservations/ with the id left out.
pub async fn missing_reservation_id() -> ApiError {
    ApiError::bad_request("reservationId is required")
}

/// GET /reservations
pub async fn reservation_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state.register.summary().await?;
    Ok(Json(summary.into()))
}
