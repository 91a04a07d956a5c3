//! Storage seam consumed by the inventory ledger and reservation register.
//!
//! A store offers point reads plus [`InventoryStore::begin`], which opens a
//! [`StoreTransaction`]. Writes issued through a transaction become visible
//! all at once on [`StoreTransaction::commit`]; a transaction that is rolled
//! back or dropped leaves no trace. Conditional updates report how many rows
//! they touched so callers can detect lost races.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use ticketboss_core::config::{AppConfig, StoreProvider};
use ticketboss_core::result::AppResult;
use ticketboss_core::types::{EventId, ReservationId};
use ticketboss_entity::event::{Event, NewEvent};
use ticketboss_entity::reservation::{NewReservation, Reservation};

pub use memory::MemoryInventoryStore;
pub use postgres::PgInventoryStore;

/// Durable store holding event inventory and reservation rows.
#[async_trait]
pub trait InventoryStore: Send + Sync + fmt::Debug + 'static {
    /// Point read of an event row.
    async fn find_event(&self, event_id: &EventId) -> AppResult<Option<Event>>;

    /// Point read of a reservation row.
    async fn find_reservation(&self, id: &ReservationId) -> AppResult<Option<Reservation>>;

    /// Every reservation of the event, oldest first.
    async fn list_reservations(&self, event_id: &EventId) -> AppResult<Vec<Reservation>>;

    /// Insert the event unless it already exists. Returns `true` if inserted.
    async fn seed_event(&self, event: &NewEvent) -> AppResult<bool>;

    /// Open an all-or-nothing transaction.
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// An open store transaction.
///
/// Dropping a transaction without calling [`commit`](Self::commit)
/// discards every write made through it.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Read an event row as seen by this transaction.
    async fn find_event(&mut self, event_id: &EventId) -> AppResult<Option<Event>>;

    /// Count reservations of the event that still hold seats.
    async fn count_confirmed(&mut self, event_id: &EventId) -> AppResult<u64>;

    /// Insert a reservation in `confirmed` status.
    async fn insert_reservation(&mut self, reservation: &NewReservation) -> AppResult<()>;

    /// `confirmed -> cancelled` guarded on the current status.
    ///
    /// Returns the number of rows affected (0 if absent or already cancelled).
    async fn cancel_if_confirmed(&mut self, id: &ReservationId) -> AppResult<u64>;

    /// `available_seats += delta, version += 1` guarded on `version = expected_version`.
    ///
    /// Returns the number of rows affected. An adjustment that would leave
    /// `available_seats` outside `0..=total_seats` fails with an internal error.
    async fn adjust_if_version(
        &mut self,
        event_id: &EventId,
        delta: i32,
        expected_version: i64,
    ) -> AppResult<u64>;

    /// Make every write of this transaction visible atomically.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write of this transaction.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Store manager that wraps the configured store provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn InventoryStore>,
    provider: StoreProvider,
}

impl StoreManager {
    /// Open the store selected by `config.store.provider`.
    ///
    /// For PostgreSQL this connects the pool and runs pending migrations.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let provider = config.store.provider;
        let inner: Arc<dyn InventoryStore> = match provider {
            StoreProvider::Postgres => {
                info!("Initializing PostgreSQL inventory store");
                Arc::new(PgInventoryStore::connect(&config.database).await?)
            }
            StoreProvider::Memory => {
                info!("Initializing in-memory inventory store");
                Arc::new(MemoryInventoryStore::new())
            }
        };

        Ok(Self { inner, provider })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn InventoryStore>, provider: StoreProvider) -> Self {
        Self {
            inner: store,
            provider,
        }
    }

    /// Which provider backs this manager.
    pub fn provider(&self) -> StoreProvider {
        self.provider
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<dyn InventoryStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl InventoryStore for StoreManager {
    async fn find_event(&self, event_id: &EventId) -> AppResult<Option<Event>> {
        self.inner.find_event(event_id).await
    }

    async fn find_reservation(&self, id: &ReservationId) -> AppResult<Option<Reservation>> {
        self.inner.find_reservation(id).await
    }

    async fn list_reservations(&self, event_id: &EventId) -> AppResult<Vec<Reservation>> {
        self.inner.list_reservations(event_id).await
    }

    async fn seed_event(&self, event: &NewEvent) -> AppResult<bool> {
        self.inner.seed_event(event).await
    }

    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        self.inner.begin().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
