//! In-memory inventory store using a Tokio mutex for single-node deployments.
//!
//! A transaction takes the table lock for its whole lifetime and records the
//! rows it writes in a private write set. Reads look at the write set first.
//! Commit applies the write set to the tables; dropping the transaction
//! releases the lock and throws the write set away.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use ticketboss_core::error::AppError;
use ticketboss_core::result::AppResult;
use ticketboss_core::types::{EventId, ReservationId};
use ticketboss_entity::event::{Event, NewEvent};
use ticketboss_entity::reservation::{NewReservation, Reservation, ReservationStatus};

use super::{InventoryStore, StoreTransaction};

/// Rows held by the memory store.
#[derive(Debug, Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    reservations: HashMap<ReservationId, Reservation>,
    /// Seat-holding reservations per event, kept in step with `reservations`.
    confirmed: HashMap<EventId, u64>,
}

impl Tables {
    fn holds_seats(&self, id: &ReservationId) -> bool {
        self.reservations
            .get(id)
            .is_some_and(|r| r.status.holds_seats())
    }

    fn apply(&mut self, writes: WriteSet) {
        self.events.extend(writes.events);
        for (id, row) in writes.reservations {
            let before = self.holds_seats(&id);
            let after = row.status.holds_seats();
            let counter = self.confirmed.entry(row.event_id.clone()).or_default();
            match (before, after) {
                (false, true) => *counter += 1,
                (true, false) => *counter = counter.saturating_sub(1),
                _ => {}
            }
            self.reservations.insert(id, row);
        }
    }
}

/// Rows written by an open transaction, keyed like [`Tables`].
#[derive(Debug, Default)]
struct WriteSet {
    events: HashMap<EventId, Event>,
    reservations: HashMap<ReservationId, Reservation>,
}

/// In-memory inventory store.
///
/// Suitable for tests and single-node development only; nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryInventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn find_event(&self, event_id: &EventId) -> AppResult<Option<Event>> {
        let tables = self.tables.lock().await;
        Ok(tables.events.get(event_id).cloned())
    }

    async fn find_reservation(&self, id: &ReservationId) -> AppResult<Option<Reservation>> {
        let tables = self.tables.lock().await;
        Ok(tables.reservations.get(id).cloned())
    }

    async fn list_reservations(&self, event_id: &EventId) -> AppResult<Vec<Reservation>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Reservation> = tables
            .reservations
            .values()
            .filter(|r| &r.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.reservation_id.as_uuid().cmp(b.reservation_id.as_uuid()))
        });
        Ok(rows)
    }

    async fn seed_event(&self, event: &NewEvent) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.events.contains_key(&event.event_id) {
            return Ok(false);
        }
        tables
            .events
            .insert(event.event_id.clone(), event.clone().into_event());
        Ok(true)
    }

    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tables = Arc::clone(&self.tables).lock_owned().await;
        Ok(Box::new(MemoryTransaction {
            tables,
            writes: WriteSet::default(),
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// An open memory transaction.
#[derive(Debug)]
struct MemoryTransaction {
    tables: OwnedMutexGuard<Tables>,
    writes: WriteSet,
}

impl MemoryTransaction {
    fn event(&self, event_id: &EventId) -> Option<&Event> {
        self.writes
            .events
            .get(event_id)
            .or_else(|| self.tables.events.get(event_id))
    }

    fn reservation(&self, id: &ReservationId) -> Option<&Reservation> {
        self.writes
            .reservations
            .get(id)
            .or_else(|| self.tables.reservations.get(id))
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn find_event(&mut self, event_id: &EventId) -> AppResult<Option<Event>> {
        Ok(self.event(event_id).cloned())
    }

    async fn count_confirmed(&mut self, event_id: &EventId) -> AppResult<u64> {
        let mut count = self.tables.confirmed.get(event_id).copied().unwrap_or(0);
        for (id, row) in &self.writes.reservations {
            if &row.event_id != event_id {
                continue;
            }
            match (self.tables.holds_seats(id), row.status.holds_seats()) {
                (false, true) => count += 1,
                (true, false) => count = count.saturating_sub(1),
                _ => {}
            }
        }
        Ok(count)
    }

    async fn insert_reservation(&mut self, reservation: &NewReservation) -> AppResult<()> {
        if self.event(&reservation.event_id).is_none() {
            return Err(AppError::database(format!(
                "Reservation references unknown event {}",
                reservation.event_id
            )));
        }
        if self.reservation(&reservation.reservation_id).is_some() {
            return Err(AppError::database(format!(
                "Duplicate reservation id {}",
                reservation.reservation_id
            )));
        }
        self.writes.reservations.insert(
            reservation.reservation_id,
            reservation.clone().into_confirmed(),
        );
        Ok(())
    }

    async fn cancel_if_confirmed(&mut self, id: &ReservationId) -> AppResult<u64> {
        let Some(mut row) = self
            .reservation(id)
            .filter(|r| r.status.can_transition_to(ReservationStatus::Cancelled))
            .cloned()
        else {
            return Ok(0);
        };
        row.status = ReservationStatus::Cancelled;
        row.cancelled_at = Some(Utc::now());
        self.writes.reservations.insert(*id, row);
        Ok(1)
    }

    async fn adjust_if_version(
        &mut self,
        event_id: &EventId,
        delta: i32,
        expected_version: i64,
    ) -> AppResult<u64> {
        let Some(current) = self.event(event_id) else {
            return Ok(0);
        };
        if current.version != expected_version {
            debug!(
                event_id = %event_id,
                expected_version,
                current_version = current.version,
                "Version guard did not match"
            );
            return Ok(0);
        }
        if !current.accepts_delta(delta) {
            return Err(AppError::internal(format!(
                "Inventory invariant violated for event {event_id}: delta {delta} out of range"
            )));
        }
        let mut next = current.clone();
        next.available_seats += delta;
        next.version += 1;
        self.writes.events.insert(event_id.clone(), next);
        Ok(1)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { mut tables, writes } = *self;
        tables.apply(writes);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
