//! Typed path parameter helpers.

use ticketboss_core::types::ReservationId;

use crate::error::ApiError;

/// Parses a reservation id from a path segment.
pub fn parse_reservation_id(s: &str) -> Result<ReservationId, ApiError> {
    if s.trim().is_empty() {
        return Err(ApiError::bad_request("reservationId is required"));
    }
    s.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid reservationId: {s}")))
}
