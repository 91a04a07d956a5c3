//! Reservation register: booking and cancellation against the inventory ledger.
//!
//! Each mutation follows the same cycle: read a ledger snapshot, open a store
//! transaction, write the reservation row, then adjust the inventory guarded
//! on the snapshot's version. A version mismatch rolls the whole transaction
//! back and surfaces as [`ReservationError::Conflict`]. Nothing here retries.

use std::sync::Arc;

use tracing::{info, warn};

use ticketboss_core::config::ReservationPolicyConfig;
use ticketboss_core::error::AppError;
use ticketboss_core::types::{EventId, ReservationId};
use ticketboss_database::store::InventoryStore;
use ticketboss_entity::reservation::{NewReservation, ReservationStatus};

use crate::error::{ReservationError, ReservationResult};
use crate::ledger::{AdjustOutcome, InventoryLedger};

/// Outcome of a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedReservation {
    /// Freshly generated id.
    pub reservation_id: ReservationId,
    /// Seats held.
    pub seats: i32,
    /// Always `confirmed`.
    pub status: ReservationStatus,
}

/// Point-in-time view of the event inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationSummary {
    pub event_id: EventId,
    pub name: String,
    pub total_seats: i32,
    pub available_seats: i32,
    /// Number of reservations still `confirmed`.
    pub reservation_count: u64,
    pub version: i64,
}

/// Books and cancels seats of a single event.
#[derive(Debug, Clone)]
pub struct ReservationRegister {
    store: Arc<dyn InventoryStore>,
    ledger: InventoryLedger,
    event_id: EventId,
    policy: ReservationPolicyConfig,
}

impl ReservationRegister {
    /// Creates a register for `event_id` over the given store.
    pub fn new(
        store: Arc<dyn InventoryStore>,
        event_id: EventId,
        policy: ReservationPolicyConfig,
    ) -> Self {
        Self {
            ledger: InventoryLedger::new(Arc::clone(&store)),
            store,
            event_id,
            policy,
        }
    }

    /// Book `seats` seats for `partner_id`.
    ///
    /// The capacity pre-check only avoids a doomed transaction; the
    /// version-guarded adjustment is what keeps the count correct.
    pub async fn create(
        &self,
        partner_id: &str,
        seats: i32,
    ) -> ReservationResult<CreatedReservation> {
        let partner_id = partner_id.trim();
        if partner_id.is_empty() {
            return Err(ReservationError::invalid_input(
                "partnerId",
                "must not be blank",
            ));
        }
        let max = self.policy.max_seats_per_request;
        if !(1..=max).contains(&seats) {
            return Err(ReservationError::invalid_input(
                "seats",
                format!("must be between 1 and {max}"),
            ));
        }

        let snapshot = self.ledger.read_snapshot(&self.event_id).await?;
        if seats > snapshot.available_seats {
            info!(
                event_id = %self.event_id,
                partner_id = %partner_id,
                requested = seats,
                available = snapshot.available_seats,
                "Reservation rejected: not enough seats"
            );
            return Err(ReservationError::InsufficientCapacity {
                requested: seats,
                available: snapshot.available_seats,
            });
        }

        let reservation = NewReservation::new(self.event_id.clone(), partner_id, seats);

        let mut tx = self.store.begin().await?;
        tx.insert_reservation(&reservation).await?;
        let outcome = self
            .ledger
            .conditional_adjust(tx.as_mut(), &self.event_id, -seats, snapshot.version)
            .await?;

        match outcome {
            AdjustOutcome::Applied => {
                tx.commit().await?;
                info!(
                    event_id = %self.event_id,
                    reservation_id = %reservation.reservation_id,
                    partner_id = %partner_id,
                    seats,
                    version = snapshot.version + 1,
                    "Reservation confirmed"
                );
                Ok(CreatedReservation {
                    reservation_id: reservation.reservation_id,
                    seats,
                    status: ReservationStatus::Confirmed,
                })
            }
            AdjustOutcome::VersionMismatch => {
                tx.rollback().await?;
                warn!(
                    event_id = %self.event_id,
                    partner_id = %partner_id,
                    seats,
                    expected_version = snapshot.version,
                    "Reservation lost an inventory race"
                );
                Err(ReservationError::Conflict {
                    event_id: self.event_id.clone(),
                    expected_version: snapshot.version,
                })
            }
        }
    }

    /// Cancel a confirmed reservation and give its seats back.
    pub async fn cancel(&self, reservation_id: &ReservationId) -> ReservationResult<()> {
        let not_found = || ReservationError::NotFound {
            reservation_id: *reservation_id,
        };

        let reservation = match self.store.find_reservation(reservation_id).await? {
            Some(r) if r.status.holds_seats() => r,
            _ => return Err(not_found()),
        };
        let event_id = reservation.event_id;

        let snapshot = self.ledger.read_snapshot(&event_id).await?;

        let mut tx = self.store.begin().await?;
        match tx.cancel_if_confirmed(reservation_id).await? {
            1 => {}
            0 => {
                tx.rollback().await?;
                return Err(not_found());
            }
            n => {
                return Err(AppError::internal(format!(
                    "{n} rows cancelled for reservation {reservation_id}"
                ))
                .into());
            }
        }

        let outcome = self
            .ledger
            .conditional_adjust(tx.as_mut(), &event_id, reservation.seats, snapshot.version)
            .await?;

        match outcome {
            AdjustOutcome::Applied => {
                tx.commit().await?;
                info!(
                    event_id = %event_id,
                    reservation_id = %reservation_id,
                    seats = reservation.seats,
                    version = snapshot.version + 1,
                    "Reservation cancelled"
                );
                Ok(())
            }
            AdjustOutcome::VersionMismatch => {
                tx.rollback().await?;
                warn!(
                    event_id = %event_id,
                    reservation_id = %reservation_id,
                    expected_version = snapshot.version,
                    "Cancellation lost an inventory race"
                );
                Err(ReservationError::Conflict {
                    event_id,
                    expected_version: snapshot.version,
                })
            }
        }
    }

    /// Read-only inventory summary taken inside one store transaction.
    pub async fn summary(&self) -> ReservationResult<ReservationSummary> {
        let mut tx = self.store.begin().await?;
        let event = tx.find_event(&self.event_id).await?.ok_or_else(|| {
            AppError::internal(format!("Event {} not found", self.event_id))
        })?;
        let reservation_count = tx.count_confirmed(&self.event_id).await?;
        tx.rollback().await?;

        Ok(ReservationSummary {
            event_id: event.event_id,
            name: event.name,
            total_seats: event.total_seats,
            available_seats: event.available_seats,
            reservation_count,
            version: event.version,
        })
    }
}
