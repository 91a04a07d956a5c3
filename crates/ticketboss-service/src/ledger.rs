//! Inventory ledger: the seat counter and its version stamp.
//!
//! `available_seats` and `version` change only through
//! [`InventoryLedger::conditional_adjust`], a compare-and-swap on the version
//! observed by the caller's snapshot.

use std::sync::Arc;

use tracing::{debug, error};

use ticketboss_core::error::AppError;
use ticketboss_core::types::EventId;
use ticketboss_database::store::{InventoryStore, StoreTransaction};
use ticketboss_entity::event::{Event, InventorySnapshot};

use crate::error::ReservationResult;

/// Result of a version-guarded adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// The row matched the expected version and was updated.
    Applied,
    /// The row's version moved on; nothing was written.
    VersionMismatch,
}

/// Reads and conditionally mutates event inventory.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    store: Arc<dyn InventoryStore>,
}

impl InventoryLedger {
    /// Creates a ledger over the given store.
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Full event row, outside any transaction.
    pub async fn read_event(&self, event_id: &EventId) -> ReservationResult<Event> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or_else(|| missing_event(event_id).into())
    }

    /// Current `{available_seats, version}` of the event.
    pub async fn read_snapshot(&self, event_id: &EventId) -> ReservationResult<InventorySnapshot> {
        let snapshot = self.read_event(event_id).await?.snapshot();
        debug!(
            event_id = %event_id,
            available_seats = snapshot.available_seats,
            version = snapshot.version,
            "Read inventory snapshot"
        );
        Ok(snapshot)
    }

    /// Add `delta` to `available_seats` if the version still equals `expected_version`.
    ///
    /// Runs inside the caller's transaction. More than one affected row means
    /// the event key is not unique and is reported as an internal error.
    pub async fn conditional_adjust(
        &self,
        tx: &mut dyn StoreTransaction,
        event_id: &EventId,
        delta: i32,
        expected_version: i64,
    ) -> ReservationResult<AdjustOutcome> {
        let rows = tx
            .adjust_if_version(event_id, delta, expected_version)
            .await
            .inspect_err(|e| {
                error!(
                    event_id = %event_id,
                    delta,
                    expected_version,
                    error = %e,
                    "Inventory adjustment failed"
                );
            })?;

        match rows {
            0 => Ok(AdjustOutcome::VersionMismatch),
            1 => Ok(AdjustOutcome::Applied),
            n => {
                error!(
                    event_id = %event_id,
                    rows = n,
                    expected_version,
                    "Conditional adjustment touched more than one event row"
                );
                Err(AppError::internal(format!(
                    "Inventory invariant violated: {n} rows updated for event {event_id}"
                ))
                .into())
            }
        }
    }
}

fn missing_event(event_id: &EventId) -> AppError {
    error!(event_id = %event_id, "Event inventory row is missing");
    AppError::internal(format!("Event {event_id} not found"))
}
