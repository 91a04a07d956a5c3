//! PostgreSQL inventory store.
//!
//! Each [`StoreTransaction`] wraps a `sqlx::Transaction`; dropping it
//! without commit rolls back on the server. The conditional `UPDATE`
//! statements are single-row compare-and-swap operations: under READ
//! COMMITTED a concurrent writer that committed first makes the `WHERE`
//! clause re-evaluate against the new row and match zero rows.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::info;

use ticketboss_core::config::DatabaseConfig;
use ticketboss_core::error::{AppError, ErrorKind};
use ticketboss_core::result::AppResult;
use ticketboss_core::types::{EventId, ReservationId};
use ticketboss_entity::event::{Event, NewEvent};
use ticketboss_entity::reservation::{NewReservation, Reservation, ReservationStatus};

use super::{InventoryStore, StoreTransaction};

const EVENT_COLUMNS: &str = "event_id, name, total_seats, available_seats, version";

const RESERVATION_COLUMNS: &str =
    "reservation_id, event_id, partner_id, seats, status, created_at, cancelled_at";

/// Name of the CHECK constraint bounding `available_seats`.
const AVAILABLE_RANGE_CONSTRAINT: &str = "events_available_seats_range";

/// Inventory store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from configuration and bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %redact_url(&config.url),
            max_connections = config.max_connections,
            "Opening inventory database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to open inventory database: {e}"),
                    e,
                )
            })?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Inventory schema migration failed: {e}"),
                    e,
                )
            })?;

        info!("Inventory schema is up to date");
        Ok(())
    }
}

/// Drop the password from a connection URL before it is logged.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn find_event(&self, event_id: &EventId) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find event", e))
    }

    async fn find_reservation(&self, id: &ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find reservation", e))
    }

    async fn list_reservations(&self, event_id: &EventId) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE event_id = $1 \
             ORDER BY created_at, reservation_id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list reservations", e))
    }

    async fn seed_event(&self, event: &NewEvent) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO events (event_id, name, total_seats, available_seats, version) \
             VALUES ($1, $2, $3, $3, 0) ON CONFLICT (event_id) DO NOTHING",
        )
        .bind(&event.event_id)
        .bind(&event.name)
        .bind(event.total_seats)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to seed event", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// An open PostgreSQL transaction.
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn find_event(&mut self, event_id: &EventId) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find event", e))
    }

    async fn count_confirmed(&mut self, event_id: &EventId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(ReservationStatus::Confirmed)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count reservations", e)
        })?;

        Ok(count.max(0) as u64)
    }

    async fn insert_reservation(&mut self, reservation: &NewReservation) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO reservations \
             (reservation_id, event_id, partner_id, seats, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(reservation.reservation_id)
        .bind(&reservation.event_id)
        .bind(&reservation.partner_id)
        .bind(reservation.seats)
        .bind(ReservationStatus::Confirmed)
        .bind(reservation.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert reservation", e))?;

        Ok(())
    }

    async fn cancel_if_confirmed(&mut self, id: &ReservationId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE reservations SET status = $2, cancelled_at = NOW() \
             WHERE reservation_id = $1 AND status = $3",
        )
        .bind(id)
        .bind(ReservationStatus::Cancelled)
        .bind(ReservationStatus::Confirmed)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel reservation", e))?;

        Ok(result.rows_affected())
    }

    async fn adjust_if_version(
        &mut self,
        event_id: &EventId,
        delta: i32,
        expected_version: i64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE events SET available_seats = available_seats + $2, version = version + 1 \
             WHERE event_id = $1 AND version = $3",
        )
        .bind(event_id)
        .bind(delta)
        .bind(expected_version)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(AVAILABLE_RANGE_CONSTRAINT) =>
            {
                AppError::internal(format!(
                    "Inventory invariant violated for event {event_id}: delta {delta} out of range"
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to adjust inventory", e),
        })?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}
