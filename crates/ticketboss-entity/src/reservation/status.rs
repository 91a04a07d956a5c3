//! Reservation lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persisted state of a reservation.
///
/// The only transition is `Confirmed -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Seats are held.
    Confirmed,
    /// Seats were returned to the inventory.
    Cancelled,
}

impl ReservationStatus {
    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!((self, next), (Self::Confirmed, Self::Cancelled))
    }

    /// Whether the reservation still holds seats.
    pub fn holds_seats(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ticketboss_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ticketboss_core::AppError::invalid_input(format!(
                "Invalid reservation status: '{s}'. Expected one of: confirmed, cancelled"
            ))),
        }
    }
}
