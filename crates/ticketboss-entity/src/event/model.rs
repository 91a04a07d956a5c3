//! Event inventory entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use ticketboss_core::types::EventId;

/// A seated event and its inventory ledger row.
///
/// `available_seats` and `version` change together, exactly once per
/// successful reservation or cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Stable event identifier.
    pub event_id: EventId,
    /// Human-readable name.
    pub name: String,
    /// Fixed capacity.
    pub total_seats: i32,
    /// Seats not held by a confirmed reservation.
    pub available_seats: i32,
    /// Optimistic concurrency stamp.
    pub version: i64,
}

impl Event {
    /// The pair of fields guarded by the version stamp.
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            available_seats: self.available_seats,
            version: self.version,
        }
    }

    /// Seats currently held by confirmed reservations.
    pub fn reserved_seats(&self) -> i32 {
        self.total_seats - self.available_seats
    }

    /// Whether applying `delta` keeps `0 <= available <= total`.
    pub fn accepts_delta(&self, delta: i32) -> bool {
        self.available_seats
            .checked_add(delta)
            .is_some_and(|next| (0..=self.total_seats).contains(&next))
    }
}

/// Point-in-time read of an event's counter and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InventorySnapshot {
    /// Seats available when the snapshot was taken.
    pub available_seats: i32,
    /// Version observed alongside `available_seats`.
    pub version: i64,
}

/// Data for seeding a new event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event identifier.
    pub event_id: EventId,
    /// Event name.
    pub name: String,
    /// Capacity; the event starts fully available at version 0.
    pub total_seats: i32,
}

impl NewEvent {
    /// Materialize the initial ledger row.
    pub fn into_event(self) -> Event {
        Event {
            event_id: self.event_id,
            name: self.name,
            total_seats: self.total_seats,
            available_seats: self.total_seats,
            version: 0,
        }
    }
}
