//! HTTP API tests with the aggregator unreachable.
//!
//! Every session here ends up simulated, either through the demo marker or
//! because the upstream points at a closed port.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use ride_server::clock::SystemClock;
use ride_server::namma_yatri::{NammaYatriClient, NammaYatriConfig};
use ride_server::session::{RegistryConfig, SessionRegistry};
use ride_server::web::{AppState, create_router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let config = NammaYatriConfig::new()
        .with_base_url("http://127.0.0.1:1")
        .with_timeout(2);
    let upstream = NammaYatriClient::new(config).unwrap();
    let sessions = SessionRegistry::new(&RegistryConfig::default(), upstream, Arc::new(SystemClock));
    create_router(AppState::new(sessions))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn demo_trip(user_id: &str) -> Value {
    json!({
        "pickup": {"lat": 12.9352, "lon": 77.6245, "address": "Demo Koramangala"},
        "dropoff": {"lat": 12.9716, "lon": 77.5946, "address": "MG Road"},
        "userId": user_id,
    })
}

#[tokio::test]
async fn health_check() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn banner_lists_ride_endpoints() {
    let (status, body) = send(&app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);

    let rides = body["endpoints"]["rides"].as_array().unwrap();
    assert!(rides.contains(&json!("/api/rides/auth/send-otp")));
    assert!(rides.contains(&json!("/api/rides/poll-status/:bookingId")));
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        post("/api/rides/auth/send-otp", json!({"mobileNumber": "9876543210"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "mobileNumber and userId are required"})
    );

    // Empty strings count as missing
    let (status, body) = send(
        &app,
        post("/api/rides/book", json!({"estimateId": "", "userId": "u1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "estimateId and userId are required");

    let (status, body) = send(&app, post("/api/rides/search", json!({"userId": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "pickup, dropoff, and userId are required");

    let (status, body) = send(&app, get("/api/rides/status/sim_book_x")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId is required");
}

#[tokio::test]
async fn empty_body_fails_validation() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/rides/cancel")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bookingId and userId are required");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/rides/auth/verify-otp")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn otp_falls_back_to_simulation() {
    let app = app();

    let (status, body) = send(
        &app,
        post(
            "/api/rides/auth/send-otp",
            json!({"mobileNumber": "9876543210", "userId": "u1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["simulated"], true);
    assert_eq!(body["data"]["attempts"], 3);

    let (_, body) = send(
        &app,
        post("/api/rides/auth/verify-otp", json!({"otp": "1111", "userId": "u1"})),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "sim_token_xyz_123");
}

#[tokio::test]
async fn simulated_booking_flow() {
    let app = app();

    let (status, body) = send(&app, post("/api/rides/search", demo_trip("u1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["simulated"], true);
    let search_id = body["searchId"].as_str().unwrap().to_string();
    assert!(search_id.starts_with("sim_search_"));

    let (_, body) = send(&app, get(&format!("/api/rides/estimates/{search_id}?userId=u1"))).await;
    let estimates = body["estimates"].as_array().unwrap();
    assert_eq!(estimates.len(), 2);
    assert_eq!(estimates[0]["vehicleVariant"], "AUTO_RICKSHAW");
    assert_eq!(estimates[1]["vehicleVariant"], "SEDAN");
    let estimate_id = estimates[0]["estimateId"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        post(
            "/api/rides/book",
            json!({"estimateId": estimate_id, "userId": "u1"}),
        ),
    )
    .await;
    assert_eq!(body["success"], true);
    let booking_id = body["bookingId"].as_str().unwrap().to_string();
    assert!(booking_id.starts_with("sim_book_"));

    let (_, body) = send(&app, get(&format!("/api/rides/status/{booking_id}?userId=u1"))).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "SEARCHING");

    let (_, body) = send(
        &app,
        post(
            "/api/rides/cancel",
            json!({"bookingId": booking_id, "userId": "u1"}),
        ),
    )
    .await;
    assert_eq!(body, json!({"success": true, "simulated": true}));

    let (status, body) =
        send(&app, get(&format!("/api/rides/status/{booking_id}?userId=u1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "error": "Booking not found"}));
}

#[tokio::test]
async fn sessions_are_per_user() {
    let app = app();

    let mut trip = demo_trip("alice");
    trip["waitTime"] = json!(0);
    let (_, body) = send(&app, post("/api/rides/book-complete", trip)).await;
    assert_eq!(body["success"], true);
    let booking_id = body["bookingId"].as_str().unwrap().to_string();

    let (_, body) = send(&app, get(&format!("/api/rides/status/{booking_id}?userId=alice"))).await;
    assert_eq!(body["success"], true);

    let (_, body) = send(&app, get(&format!("/api/rides/status/{booking_id}?userId=bob"))).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn numeric_user_id_is_accepted() {
    let (status, body) = send(
        &app(),
        post(
            "/api/rides/search",
            json!({
                "pickup": {"lat": 12.9, "lon": 77.5, "address": "Demo Airport"},
                "dropoff": {"lat": 12.97, "lon": 77.59, "address": "MG Road"},
                "userId": 7,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn poll_unknown_booking_fails_fast() {
    let (status, body) = send(
        &app(),
        get("/api/rides/poll-status/sim_book_missing?userId=u1&maxAttempts=3&interval=1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "error": "Booking not found"}));
}

#[tokio::test]
async fn autocomplete_reports_unreachable_upstream() {
    let (status, body) = send(
        &app(),
        post(
            "/api/rides/location/autocomplete",
            json!({"searchText": "MG Ro", "userId": "u1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn numeric_text_wait_time_is_accepted() {
    let mut trip = demo_trip("u1");
    trip["waitTime"] = json!("0");

    let (status, body) = send(&app(), post("/api/rides/book-complete", trip)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["bookingId"].as_str().unwrap().starts_with("sim_book_"));
}
