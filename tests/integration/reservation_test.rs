//! Integration tests for the reservation endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_fresh_event_summary() {
    let app = helpers::TestApp::new().await;

    let summary = app.summary().await;
    assert_eq!(summary["eventId"], "node-meetup-2025");
    assert_eq!(summary["name"], "Node.js Meet-up");
    assert_eq!(summary["totalSeats"], 500);
    assert_eq!(summary["availableSeats"], 500);
    assert_eq!(summary["reservationCount"], 0);
    assert_eq!(summary["version"], 0);
}

#[tokio::test]
async fn test_create_reservation() {
    let app = helpers::TestApp::new().await;

    let response = app.reserve("p1", 5).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["seats"], 5);
    assert_eq!(response.body["status"], "confirmed");
    assert!(uuid::Uuid::parse_str(&response.reservation_id()).is_ok());

    let summary = app.summary().await;
    assert_eq!(summary["availableSeats"], 495);
    assert_eq!(summary["reservationCount"], 1);
    assert_eq!(summary["version"], 1);
    app.assert_inventory_consistent().await;
}

#[tokio::test]
async fn test_request_larger_than_remaining_is_rejected() {
    let app = helpers::TestApp::with_capacity(12).await;
    assert_eq!(app.reserve("p1", 10).await.status, StatusCode::CREATED);

    let response = app.reserve("p2", 3).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "INSUFFICIENT_CAPACITY");

    let summary = app.summary().await;
    assert_eq!(summary["availableSeats"], 2);
    assert_eq!(summary["version"], 1);
    assert_eq!(summary["reservationCount"], 1);
}

#[tokio::test]
async fn test_cancel_returns_seats_once() {
    let app = helpers::TestApp::new().await;
    let id = app.reserve("p1", 5).await.reservation_id();

    let response = app.cancel(&id).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.body, serde_json::Value::Null);

    let summary = app.summary().await;
    assert_eq!(summary["availableSeats"], 500);
    assert_eq!(summary["reservationCount"], 0);
    assert_eq!(summary["version"], 2);

    let again = app.cancel(&id).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body["error"], "NOT_FOUND");
    assert_eq!(app.summary().await, summary);
    app.assert_inventory_consistent().await;
}

#[tokio::test]
async fn test_cancel_unknown_reservation() {
    let app = helpers::TestApp::new().await;

    let response = app.cancel(&uuid::Uuid::new_v4().to_string()).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.summary().await["version"], 0);
}

#[tokio::test]
async fn test_cancel_malformed_id() {
    let app = helpers::TestApp::new().await;

    let response = app.cancel("not-a-uuid").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_INPUT");

    let missing = app.request("DELETE", "/reservations/", None).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_seat_boundaries() {
    let app = helpers::TestApp::new().await;

    for seats in [0, 11, -3] {
        let response = app.reserve("p1", seats).await;
        assert_eq!(
            response.status,
            StatusCode::BAD_REQUEST,
            "seats = {seats}: {:?}",
            response.body
        );
    }
    assert_eq!(app.reserve("p1", 1).await.status, StatusCode::CREATED);
    assert_eq!(app.reserve("p1", 10).await.status, StatusCode::CREATED);

    let summary = app.summary().await;
    assert_eq!(summary["availableSeats"], 489);
    assert_eq!(summary["version"], 2);
}

#[tokio::test]
async fn test_invalid_bodies() {
    let app = helpers::TestApp::new().await;

    let cases = [
        json!({ "partnerId": "   ", "seats": 2 }),
        json!({ "partnerId": "", "seats": 2 }),
        json!({ "seats": 2 }),
        json!({ "partnerId": "p1" }),
        json!({ "partnerId": "p1", "seats": "two" }),
        json!({ "partnerId": "p1", "seats": 2.5 }),
        json!({ "partnerId": 42, "seats": 2 }),
    ];
    for body in cases {
        let response = app.request("POST", "/reservations", Some(body.clone())).await;
        assert_eq!(
            response.status,
            StatusCode::BAD_REQUEST,
            "{body}: {:?}",
            response.body
        );
    }

    let malformed = app
        .request_raw("POST", "/reservations", "{\"partnerId\": \"p1\",")
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.summary().await["version"], 0);
}

#[tokio::test]
async fn test_partner_id_is_trimmed() {
    let app = helpers::TestApp::new().await;

    let response = app.reserve("  p1  ", 2).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let id: ticketboss_core::types::ReservationId = response.reservation_id().parse().unwrap();
    let row = ticketboss_database::store::InventoryStore::find_reservation(&app.store, &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.partner_id, "p1");
}

#[tokio::test]
async fn test_sold_out_then_cancel_frees_seats() {
    let app = helpers::TestApp::with_capacity(10).await;
    let id = app.reserve("p1", 10).await.reservation_id();
    assert_eq!(app.reserve("p2", 1).await.status, StatusCode::CONFLICT);

    assert_eq!(app.cancel(&id).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.reserve("p2", 1).await.status, StatusCode::CREATED);

    let summary = app.summary().await;
    assert_eq!(summary["availableSeats"], 9);
    assert_eq!(summary["version"], 3);
    app.assert_inventory_consistent().await;
}
