//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use ticketboss_api::{AppState, build_router};
use ticketboss_core::config::{AppConfig, StoreProvider};
use ticketboss_core::types::EventId;
use ticketboss_database::store::{InventoryStore, MemoryInventoryStore, StoreManager};
use ticketboss_entity::event::NewEvent;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store behind the router, for direct inspection
    pub store: StoreManager,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Default event (500 seats) over a fresh in-memory store.
    pub async fn new() -> Self {
        Self::with_capacity(AppConfig::default().event.total_seats).await
    }

    /// Fresh in-memory store seeded with `total_seats`.
    pub async fn with_capacity(total_seats: i32) -> Self {
        let mut config = AppConfig::default();
        config.event.total_seats = total_seats;
        let store = StoreManager::from_store(
            Arc::new(MemoryInventoryStore::new()),
            StoreProvider::Memory,
        );
        Self::with_store(config, store).await
    }

    /// Router over an arbitrary store; seeds the configured event.
    pub async fn with_store(config: AppConfig, store: StoreManager) -> Self {
        store
            .seed_event(&NewEvent {
                event_id: EventId::new(config.event.id.clone()),
                name: config.event.name.clone(),
                total_seats: config.event.total_seats,
            })
            .await
            .expect("Failed to seed event");

        let router = build_router(AppState::new(config.clone(), store.clone()));

        Self {
            router,
            store,
            config,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.request_raw(method, path, &body_str).await
    }

    /// Make an HTTP request with a literal body
    pub async fn request_raw(&self, method: &str, path: &str, body: &str) -> TestResponse {
        send(self.router.clone(), method, path, body.to_string()).await
    }

    /// POST /reservations
    pub async fn reserve(&self, partner_id: &str, seats: i64) -> TestResponse {
        self.request(
            "POST",
            "/reservations",
            Some(serde_json::json!({ "partnerId": partner_id, "seats": seats })),
        )
        .await
    }

    /// DELETE /reservations/{id}
    pub async fn cancel(&self, reservation_id: &str) -> TestResponse {
        self.request("DELETE", &format!("/reservations/{reservation_id}"), None)
            .await
    }

    /// GET /reservations, asserting 200
    pub async fn summary(&self) -> Value {
        let response = self.request("GET", "/reservations", None).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body
    }

    /// `available = total - confirmed seats` and `0 <= available <= total`.
    pub async fn assert_inventory_consistent(&self) {
        let event_id = EventId::new(self.config.event.id.clone());
        let event = self
            .store
            .find_event(&event_id)
            .await
            .expect("Failed to read event")
            .expect("Event missing");
        let held: i32 = self
            .store
            .list_reservations(&event_id)
            .await
            .expect("Failed to list reservations")
            .iter()
            .filter(|r| r.status.holds_seats())
            .map(|r| r.seats)
            .sum();

        assert!(event.available_seats >= 0);
        assert!(event.available_seats <= event.total_seats);
        assert_eq!(event.available_seats, event.total_seats - held);
    }
}

/// Send one request through a router clone; usable from spawned tasks.
pub async fn send(router: Router, method: &str, path: &str, body: String) -> TestResponse {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .expect("Failed to build request");

    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `reservationId` from a 201 body.
    pub fn reservation_id(&self) -> String {
        self.body
            .get("reservationId")
            .and_then(|v| v.as_str())
            .expect("No reservationId in response")
            .to_string()
    }
}
