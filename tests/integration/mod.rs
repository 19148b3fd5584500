//! End-to-end tests for the appointments HTTP API.
//!
//! Each test builds a fresh router over its own store and drives it through
//! `tower::ServiceExt::oneshot`.

use appointments_service::api::{create_router, App, AppState};
use appointments_service::store::{AppointmentStore, IdPolicy};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Router over a seeded store, plus the store for direct inspection.
fn test_app(policy: IdPolicy) -> (App, AppointmentStore) {
    let store = AppointmentStore::seeded(policy);
    (create_router(AppState::new(store.clone())), store)
}

async fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn every_seeded_id_is_retrievable() {
    let (app, store) = test_app(IdPolicy::Length);

    for appointment in store.list().await {
        let (status, body) =
            send(&app, Method::GET, &format!("/appointments/{}", appointment.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_value(&appointment).unwrap());
    }
}

#[tokio::test]
async fn create_then_get_returns_same_record() {
    let (app, _) = test_app(IdPolicy::Length);

    let (status, created) = send(
        &app,
        Method::POST,
        "/appointments",
        Some(json!({ "patient": "Lee", "date": "2025-01-10", "time": "2:30 PM" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/appointments/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn booking_scenario() {
    let (app, _) = test_app(IdPolicy::Length);

    let (status, created) = send(
        &app,
        Method::POST,
        "/appointments",
        Some(json!({ "patient": "Sam", "date": "2024-12-03", "time": "9:00 AM" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({ "id": 3, "patient": "Sam", "date": "2024-12-03", "time": "9:00 AM" })
    );

    let (_, list) = send(&app, Method::GET, "/appointments", None).await;
    assert_eq!(ids(&list), vec![1, 2, 3]);

    let (status, body) = send(&app, Method::DELETE, "/appointments/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Appointment deleted successfully" }));

    let (_, list) = send(&app, Method::GET, "/appointments", None).await;
    assert_eq!(ids(&list), vec![2, 3]);

    let (status, body) = send(&app, Method::GET, "/appointments/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Appointment not found" }));
}

#[tokio::test]
async fn deleting_missing_id_leaves_collection_unchanged() {
    let (app, _) = test_app(IdPolicy::Length);
    let (_, before) = send(&app, Method::GET, "/appointments", None).await;

    for uri in ["/appointments/42", "/appointments/nope"] {
        let (status, body) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Appointment deleted successfully" }));
    }

    let (_, after) = send(&app, Method::GET, "/appointments", None).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn length_policy_can_assign_a_surviving_id() {
    let (app, _) = test_app(IdPolicy::Length);

    send(&app, Method::POST, "/appointments", Some(json!({ "patient": "Sam" }))).await;
    send(&app, Method::DELETE, "/appointments/1", None).await;

    let (_, created) =
        send(&app, Method::POST, "/appointments", Some(json!({ "patient": "Ann" }))).await;
    assert_eq!(created["id"], json!(3));

    let (_, list) = send(&app, Method::GET, "/appointments", None).await;
    assert_eq!(ids(&list), vec![2, 3, 3]);

    // First match in collection order wins.
    let (_, fetched) = send(&app, Method::GET, "/appointments/3", None).await;
    assert_eq!(fetched["patient"], json!("Sam"));
}

#[tokio::test]
async fn sequential_policy_assigns_fresh_ids() {
    let (app, _) = test_app(IdPolicy::Sequential);

    send(&app, Method::POST, "/appointments", Some(json!({ "patient": "Sam" }))).await;
    send(&app, Method::DELETE, "/appointments/1", None).await;

    let (_, created) =
        send(&app, Method::POST, "/appointments", Some(json!({ "patient": "Ann" }))).await;
    assert_eq!(created["id"], json!(4));
}

#[tokio::test]
async fn create_without_body_stores_only_the_id() {
    let (app, store) = test_app(IdPolicy::Length);

    let (status, created) = send(&app, Method::POST, "/appointments", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({ "id": 3 }));
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn create_stores_field_values_of_any_json_type() {
    let (app, _) = test_app(IdPolicy::Length);

    let (status, created) = send(
        &app,
        Method::POST,
        "/appointments",
        Some(json!({ "patient": 123, "date": null, "time": ["9", "AM"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({ "id": 3, "patient": 123, "date": null, "time": ["9", "AM"] })
    );

    let (_, fetched) = send(&app, Method::GET, "/appointments/3/", None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _) = test_app(IdPolicy::Length);
    let (status, _) = send(&app, Method::GET, "/patients", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
