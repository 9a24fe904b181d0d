use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookify_gcal::routes::router;
use bookify_gcal::service::mock::MockCalendarService;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use fixtures::{booking_json, busy, create_state, TEST_TOKEN};

fn app(mock: Arc<MockCalendarService>, use_gcal: bool) -> Router {
    router(create_state(mock, use_gcal))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn availability(date: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::GET)
        .uri(format!("/availability?date={}", date));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn booking(body: String, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/booking")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_availability_returns_camel_case_slots() {
    let mock = Arc::new(MockCalendarService::with_busy(vec![busy((9, 0), (11, 0))]));

    let (status, json) = send(app(mock.clone(), true), availability("2024-06-10", Some(TEST_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    let slots = json["timeSlots"].as_array().unwrap();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0]["startTime"], "09:00");
    assert_eq!(slots[0]["endTime"], "09:30");
    let busy_count = slots.iter().filter(|s| s["available"] == false).count();
    assert_eq!(busy_count, 4);
    assert_eq!(slots[4]["available"], true);
    assert_eq!(mock.list_calls(), 1);
}

#[tokio::test]
async fn test_availability_without_credential_is_unauthorized() {
    let mock = Arc::new(MockCalendarService::new());

    let (status, json) = send(app(mock.clone(), true), availability("2024-06-10", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["message"], "Unauthorized");
    assert_eq!(json["error"]["code"], 401);
    assert_eq!(mock.list_calls(), 0);
}

#[tokio::test]
async fn test_availability_with_bad_date_is_bad_request() {
    let mock = Arc::new(MockCalendarService::new());

    let (status, json) = send(app(mock, true), availability("10-06-2024", Some(TEST_TOKEN))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], 400);
}

#[tokio::test]
async fn test_availability_provider_failure_is_server_error() {
    let mock = Arc::new(MockCalendarService::failing("rate limited"));

    let (status, json) = send(app(mock, true), availability("2024-06-10", Some(TEST_TOKEN))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["message"], "Failed to fetch availability");
}

#[tokio::test]
async fn test_disabled_calendar_is_service_unavailable() {
    let mock = Arc::new(MockCalendarService::new());

    let (status, json) = send(app(mock, false), availability("2024-06-10", Some(TEST_TOKEN))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["message"], "Calendar service is disabled.");
}

#[tokio::test]
async fn test_booking_creates_event_on_owner_calendar() {
    let mock = Arc::new(MockCalendarService::new());

    let (status, json) = send(
        app(mock.clone(), true),
        booking(booking_json().to_string(), Some(TEST_TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["event"]["summary"], "Meeting with Ada Lovelace");
    assert_eq!(json["event"]["start"]["timeZone"], "America/New_York");
    assert_eq!(json["event"]["start"]["dateTime"], "2024-06-10T10:00:00-04:00");

    let created = mock.created_events();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].calendar_id, "owner@example.com");
    assert_eq!(created[0].access_token, TEST_TOKEN);
}

#[tokio::test]
async fn test_booking_missing_field_is_rejected_before_calendar() {
    let mock = Arc::new(MockCalendarService::new());
    let mut body = booking_json();
    body["email"] = Value::String("   ".to_string());

    let (status, json) = send(app(mock.clone(), true), booking(body.to_string(), Some(TEST_TOKEN))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "Missing required field: email");
    assert!(mock.created_events().is_empty());
}

#[tokio::test]
async fn test_booking_malformed_json_is_bad_request() {
    let mock = Arc::new(MockCalendarService::new());

    let (status, _) = send(app(mock.clone(), true), booking("{not json".to_string(), Some(TEST_TOKEN))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(mock.created_events().is_empty());
}

#[tokio::test]
async fn test_booking_without_credential_is_unauthorized() {
    let mock = Arc::new(MockCalendarService::new());

    let (status, _) = send(app(mock.clone(), true), booking(booking_json().to_string(), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(mock.created_events().is_empty());
}

#[tokio::test]
async fn test_availability_rejected_query_keeps_json_envelope() {
    let mock = Arc::new(MockCalendarService::new());

    let (status, json) = send(
        app(mock.clone(), true),
        availability("2024-06-10&date=2024-06-11", Some(TEST_TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], 400);
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to parse data:"), "{}", message);
    assert_eq!(mock.list_calls(), 0);
}
