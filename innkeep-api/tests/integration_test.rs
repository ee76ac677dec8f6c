use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use innkeep_api::{app, AppState, AuthConfig};
use innkeep_core::memory::InMemoryStore;

const TEST_SECRET: &str = "integration-test-secret";

fn test_app() -> Router {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store,
        AuthConfig {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        },
    );
    app(state)
}

fn token(sub: &str, role: &str) -> String {
    let claims = json!({
        "sub": sub,
        "role": role,
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_room(app: &Router, name: &str, price: &str, capacity: i32) -> Uuid {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/v1/admin/rooms",
            Some(&token("root", "ADMIN")),
            Some(json!({ "name": name, "price_per_day": price, "capacity": capacity })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn create_reservation(
    app: &Router,
    bearer: &str,
    room: Uuid,
    start: &str,
    end: &str,
) -> (StatusCode, Value) {
    send(
        app,
        request(
            Method::POST,
            "/v1/reservations",
            Some(bearer),
            Some(json!({ "start_date": start, "end_date": end, "room": room })),
        ),
    )
    .await
}

#[tokio::test]
async fn test_guest_login_issues_usable_token() {
    let app = test_app();

    let (status, body) = send(&app, request(Method::POST, "/v1/auth/guest", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let guest_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(Method::GET, "/v1/reservations", Some(&guest_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_reservations_require_authentication() {
    let app = test_app();

    let (status, _) = send(&app, request(Method::GET, "/v1/reservations", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request(Method::GET, "/v1/reservations", Some("not-a-jwt"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_customers() {
    let app = test_app();

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/v1/admin/rooms",
            Some(&token("alice", "CUSTOMER")),
            Some(json!({ "name": "Loft", "price_per_day": "80.00", "capacity": 2 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_room_validation_rejects_zero_capacity() {
    let app = test_app();

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/v1/admin/rooms",
            Some(&token("root", "ADMIN")),
            Some(json!({ "name": "Broom Closet", "price_per_day": "10.00", "capacity": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_availability_interval_validation() {
    let app = test_app();

    let (status, _) = send(
        &app,
        request(
            Method::GET,
            "/v1/rooms/available?start_date=whenever&end_date=2025-06-02T00:00:00Z",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Inverted range
    let (status, _) = send(
        &app,
        request(
            Method::GET,
            "/v1/rooms/available?start_date=2025-06-03T00:00:00Z&end_date=2025-06-02T00:00:00Z",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_availability_excludes_conflicts_and_applies_filters() {
    let app = test_app();
    let room_x = create_room(&app, "Room X", "50.00", 2).await;
    let room_y = create_room(&app, "Room Y", "70.00", 4).await;

    let alice = token("alice", "CUSTOMER");
    let (status, _) = create_reservation(
        &app,
        &alice,
        room_x,
        "2025-06-01T10:00:00Z",
        "2025-06-01T12:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Room X conflicts with the window, only Y comes back.
    let (status, body) = send(
        &app,
        request(
            Method::GET,
            "/v1/rooms/available?start_date=2025-06-01T11:00:00Z&end_date=2025-06-01T13:00:00Z",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["id"].as_str().unwrap(), room_y.to_string());

    // A free window returns both until min_capacity narrows it to Y.
    let free_window = "start_date=2025-06-02T10:00:00Z&end_date=2025-06-02T12:00:00Z";
    let (_, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/v1/rooms/available?{}", free_window),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/v1/rooms/available?{}&min_capacity=3", free_window),
            None,
            None,
        ),
    )
    .await;
    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["id"].as_str().unwrap(), room_y.to_string());
}

#[tokio::test]
async fn test_create_reservation_returns_persisted_row() {
    let app = test_app();
    let room = create_room(&app, "Room X", "50.00", 2).await;
    let alice = token("alice", "CUSTOMER");

    let (status, body) = create_reservation(
        &app,
        &alice,
        room,
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["room"].as_str().unwrap(), room.to_string());
    assert_eq!(body["user"].as_str().unwrap(), "alice");
    assert!(body["id"].as_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn test_overlapping_reservation_conflicts_with_409() {
    let app = test_app();
    let room = create_room(&app, "Room X", "50.00", 2).await;
    let alice = token("alice", "CUSTOMER");
    let bob = token("bob", "CUSTOMER");

    let (status, _) = create_reservation(
        &app,
        &alice,
        room,
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = create_reservation(
        &app,
        &bob,
        room,
        "2025-06-01T10:30:00Z",
        "2025-06-01T11:30:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Exactly one reservation persisted.
    let (_, body) = send(
        &app,
        request(
            Method::GET,
            "/v1/reservations",
            Some(&token("root", "ADMIN")),
            None,
        ),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_adjacent_reservations_both_succeed() {
    let app = test_app();
    let room = create_room(&app, "Room X", "50.00", 2).await;
    let alice = token("alice", "CUSTOMER");

    let (status, _) = create_reservation(
        &app,
        &alice,
        room,
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = create_reservation(
        &app,
        &alice,
        room,
        "2025-06-01T11:00:00Z",
        "2025-06-01T12:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_intervals_are_rejected_before_any_write() {
    let app = test_app();
    let room = create_room(&app, "Room X", "50.00", 2).await;
    let alice = token("alice", "CUSTOMER");

    let (status, _) = create_reservation(
        &app,
        &alice,
        room,
        "2025-06-01T12:00:00Z",
        "2025-06-01T10:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        create_reservation(&app, &alice, room, "not-a-date", "2025-06-01T10:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        &app,
        request(Method::GET, "/v1/reservations", Some(&alice), None),
    )
    .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unknown_room_yields_404() {
    let app = test_app();
    let alice = token("alice", "CUSTOMER");

    let (status, _) = create_reservation(
        &app,
        &alice,
        Uuid::new_v4(),
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_is_scoped_to_caller_unless_admin() {
    let app = test_app();
    let room = create_room(&app, "Room X", "50.00", 2).await;
    let alice = token("alice", "CUSTOMER");
    let bob = token("bob", "CUSTOMER");

    create_reservation(&app, &alice, room, "2025-06-01T08:00:00Z", "2025-06-01T09:00:00Z").await;
    create_reservation(&app, &bob, room, "2025-06-01T09:00:00Z", "2025-06-01T10:00:00Z").await;

    let (_, body) = send(
        &app,
        request(Method::GET, "/v1/reservations", Some(&alice), None),
    )
    .await;
    let rows = body.as_array().unwrap().clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user"].as_str().unwrap(), "alice");

    let (_, body) = send(
        &app,
        request(
            Method::GET,
            "/v1/reservations",
            Some(&token("root", "ADMIN")),
            None,
        ),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_enforces_ownership() {
    let app = test_app();
    let room = create_room(&app, "Room X", "50.00", 2).await;
    let alice = token("alice", "CUSTOMER");
    let bob = token("bob", "CUSTOMER");

    let (_, body) = create_reservation(
        &app,
        &alice,
        room,
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;
    let id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/v1/reservations/{}", id);

    // A stranger cannot delete; the row survives.
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(
        &app,
        request(Method::GET, "/v1/reservations", Some(&alice), None),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // The owner can; a repeat delete sees 404.
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_a_room_removes_its_reservations() {
    let app = test_app();
    let doomed = create_room(&app, "Doomed", "50.00", 2).await;
    let kept = create_room(&app, "Kept", "60.00", 2).await;
    let alice = token("alice", "CUSTOMER");

    create_reservation(&app, &alice, doomed, "2025-06-01T10:00:00Z", "2025-06-01T11:00:00Z").await;
    create_reservation(&app, &alice, kept, "2025-06-01T10:00:00Z", "2025-06-01T11:00:00Z").await;

    let admin = token("root", "ADMIN");
    let uri = format!("/v1/admin/rooms/{}", doomed);
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Only the surviving room's reservation remains.
    let (_, body) = send(
        &app,
        request(Method::GET, "/v1/reservations", Some(&admin), None),
    )
    .await;
    let rows = body.as_array().unwrap().clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["room"].as_str().unwrap(), kept.to_string());

    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_incomplete_request_bodies_yield_400() {
    let app = test_app();
    let alice = token("alice", "CUSTOMER");

    // Valid JSON with the room field missing.
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/v1/reservations",
            Some(&alice),
            Some(json!({
                "start_date": "2025-06-01T10:00:00Z",
                "end_date": "2025-06-01T11:00:00Z",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/v1/admin/rooms",
            Some(&token("root", "ADMIN")),
            Some(json!({ "name": "Loft" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_can_delete_any_reservation() {
    let app = test_app();
    let room = create_room(&app, "Room X", "50.00", 2).await;
    let alice = token("alice", "CUSTOMER");

    let (_, body) = create_reservation(
        &app,
        &alice,
        room,
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;
    let uri = format!("/v1/reservations/{}", body["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        request(Method::DELETE, &uri, Some(&token("root", "ADMIN")), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
