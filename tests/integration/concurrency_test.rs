//! Concurrent booking and cancellation against one shared store.
//!
//! Requests do not retry here: a 409 is an acceptable answer as long as the
//! inventory stays consistent.

mod helpers;

use std::collections::HashSet;

use futures::future::join_all;
use http::StatusCode;
use serde_json::json;

use helpers::{TestResponse, send};

fn spawn_reserve(
    app: &helpers::TestApp,
    partner_id: String,
    seats: i64,
) -> tokio::task::JoinHandle<TestResponse> {
    let router = app.router.clone();
    tokio::spawn(async move {
        let body = json!({ "partnerId": partner_id, "seats": seats }).to_string();
        send(router, "POST", "/reservations", body).await
    })
}

fn spawn_cancel(app: &helpers::TestApp, id: String) -> tokio::task::JoinHandle<TestResponse> {
    let router = app.router.clone();
    tokio::spawn(async move {
        send(router, "DELETE", &format!("/reservations/{id}"), String::new()).await
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_never_oversell() {
    let app = helpers::TestApp::with_capacity(30).await;

    let tasks = (0..60).map(|i| spawn_reserve(&app, format!("partner-{i}"), 1 + i % 3));
    let responses: Vec<TestResponse> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let mut booked = 0i64;
    let mut created = 0i64;
    for response in &responses {
        match response.status {
            StatusCode::CREATED => {
                created += 1;
                booked += response.body["seats"].as_i64().unwrap();
            }
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}: {:?}", response.body),
        }
    }

    assert!(created > 0);
    assert!(booked <= 30);
    let summary = app.summary().await;
    assert_eq!(summary["availableSeats"].as_i64().unwrap(), 30 - booked);
    assert_eq!(summary["reservationCount"].as_i64().unwrap(), created);
    assert_eq!(summary["version"].as_i64().unwrap(), created);
    app.assert_inventory_consistent().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cancels_credit_once() {
    let app = helpers::TestApp::with_capacity(50).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let response = app.reserve(&format!("partner-{i}"), 4).await;
        assert_eq!(response.status, StatusCode::CREATED);
        ids.push(response.reservation_id());
    }

    // Each id is cancelled from four tasks at once.
    let tasks: Vec<_> = ids
        .iter()
        .flat_map(|id| (0..4).map(|_| (id.clone(), spawn_cancel(&app, id.clone()))))
        .collect();

    let mut cancelled = HashSet::new();
    for (id, task) in tasks {
        let response = task.await.expect("task panicked");
        match response.status {
            StatusCode::NO_CONTENT => assert!(cancelled.insert(id.clone()), "{id} cancelled twice"),
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}: {:?}", response.body),
        }
    }

    let still_held = 5 - cancelled.len() as i64;
    let summary = app.summary().await;
    assert_eq!(summary["availableSeats"].as_i64().unwrap(), 50 - 4 * still_held);
    assert_eq!(summary["reservationCount"].as_i64().unwrap(), still_held);
    assert_eq!(
        summary["version"].as_i64().unwrap(),
        5 + cancelled.len() as i64
    );
    app.assert_inventory_consistent().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_traffic_keeps_invariant() {
    let app = helpers::TestApp::with_capacity(40).await;

    let mut seed_ids = Vec::new();
    for i in 0..8 {
        let response = app.reserve(&format!("seed-{i}"), 2).await;
        assert_eq!(response.status, StatusCode::CREATED);
        seed_ids.push(response.reservation_id());
    }

    let mut tasks: Vec<_> = (0..40)
        .map(|i| spawn_reserve(&app, format!("p{i}"), 1 + i % 4))
        .collect();
    tasks.extend(seed_ids.into_iter().map(|id| spawn_cancel(&app, id)));

    let responses: Vec<TestResponse> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let mut successes = 0i64;
    for response in &responses {
        match response.status {
            StatusCode::CREATED | StatusCode::NO_CONTENT => successes += 1,
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}: {:?}", response.body),
        }
    }

    let summary = app.summary().await;
    assert_eq!(summary["version"].as_i64().unwrap(), 8 + successes);
    app.assert_inventory_consistent().await;
}
