//! Integration tests for the health endpoint.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;

use ticketboss_core::config::{AppConfig, StoreProvider};
use ticketboss_core::error::AppError;
use ticketboss_core::result::AppResult;
use ticketboss_core::types::{EventId, ReservationId};
use ticketboss_database::store::{
    InventoryStore, MemoryInventoryStore, StoreManager, StoreTransaction,
};
use ticketboss_entity::event::{Event, NewEvent};
use ticketboss_entity::reservation::Reservation;

/// Memory store whose health check always fails.
#[derive(Debug, Default)]
struct UnreachableStore {
    inner: MemoryInventoryStore,
}

#[async_trait]
impl InventoryStore for UnreachableStore {
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
        Err(AppError::database("connection refused"))
    }
}

#[tokio::test]
async fn test_health_ok() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "memory");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let store = StoreManager::from_store(
        Arc::new(UnreachableStore::default()),
        StoreProvider::Postgres,
    );
    let app = helpers::TestApp::with_store(AppConfig::default(), store).await;

    let response = app.request("GET", "/health", None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unavailable");
    assert_eq!(response.body["store"], "postgres");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/events", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
