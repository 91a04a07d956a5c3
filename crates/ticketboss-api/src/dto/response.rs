//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ticketboss_service::{CreatedReservation, ReservationSummary};

/// Body of a `201 Created` reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: Uuid,
    pub seats: i32,
    pub status: String,
}

impl From<CreatedReservation> for ReservationResponse {
    fn from(created: CreatedReservation) -> Self {
        Self {
            reservation_id: created.reservation_id.into_uuid(),
            seats: created.seats,
            status: created.status.to_string(),
        }
    }
}

/// Body of `GET /reservations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub event_id: String,
    pub name: String,
    pub total_seats: i32,
    pub available_seats: i32,
    /// Confirmed reservations only.
    pub reservation_count: u64,
    pub version: i64,
}

impl From<ReservationSummary> for SummaryResponse {
    fn from(summary: ReservationSummary) -> Self {
        Self {
            event_id: summary.event_id.to_string(),
            name: summary.name,
            total_seats: summary.total_seats,
            available_seats: summary.available_seats,
            reservation_count: summary.reservation_count,
            version: summary.version,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `unavailable`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Backing store provider.
    pub store: String,
}
