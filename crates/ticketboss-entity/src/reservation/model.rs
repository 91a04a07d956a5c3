//! Reservation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use ticketboss_core::types::{EventId, ReservationId};

use super::status::ReservationStatus;

/// A booking of one or more seats held by a partner.
///
/// Rows are never deleted; cancelled reservations are retained so that a
/// repeated cancel can be told apart from a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub reservation_id: ReservationId,
    /// Event the seats belong to.
    pub event_id: EventId,
    /// Caller-supplied partner identifier.
    pub partner_id: String,
    /// Number of seats held.
    pub seats: i32,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// When the reservation was created.
    pub created_at: DateTime<Utc>,
    /// When the reservation was cancelled (None while confirmed).
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Data for inserting a new reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    /// Pre-generated identifier.
    pub reservation_id: ReservationId,
    /// Event the seats belong to.
    pub event_id: EventId,
    /// Partner identifier.
    pub partner_id: String,
    /// Number of seats.
    pub seats: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NewReservation {
    /// Build a reservation with a fresh id, stamped now.
    pub fn new(event_id: EventId, partner_id: impl Into<String>, seats: i32) -> Self {
        Self {
            reservation_id: ReservationId::new(),
            event_id,
            partner_id: partner_id.into(),
            seats,
            created_at: Utc::now(),
        }
    }

    /// The row as it looks once inserted.
    pub fn into_confirmed(self) -> Reservation {
        Reservation {
            reservation_id: self.reservation_id,
            event_id: self.event_id,
            partner_id: self.partner_id,
            seats: self.seats,
            status: ReservationStatus::Confirmed,
            created_at: self.created_at,
            cancelled_at: None,
        }
    }
}
