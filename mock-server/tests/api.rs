use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Booking, Room, User, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::Value;
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<String> {
    json_request("GET", uri, token, "")
}

/// Send one request through a router that keeps its state between calls.
async fn call(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

async fn admin_token(app: &mut Router) -> String {
    let body = format!(r#"{{"email":"{ADMIN_EMAIL}","password":"{ADMIN_PASSWORD}","role":"admin"}}"#);
    let resp = call(app, json_request("POST", "/login", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = body_json(resp).await;
    json["token"].as_str().unwrap().to_string()
}

async fn guest_token(app: &mut Router, email: &str) -> (String, User) {
    let body = format!(
        r#"{{"username":"guest","email":"{email}","password":"pw","password_confirmation":"pw","phone":"555","age":30}}"#
    );
    let resp = call(app, json_request("POST", "/signup", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json: Value = body_json(resp).await;
    let user: User = serde_json::from_value(json["data"].clone()).unwrap();
    (json["token"].as_str().unwrap().to_string(), user)
}

const ROOM: &str = r#"{"name":"Garden","type":"double","price":120.0,"bed_size":"queen","view":"garden","capacity":2,"description":"","amenities":["wifi"],"image":"","available":true}"#;

// --- rooms ---

#[tokio::test]
async fn list_rooms_empty() {
    let resp = app().oneshot(get("/rooms", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = body_json(resp).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn get_room_not_found() {
    let resp = app().oneshot(get("/rooms/999", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = body_json(resp).await;
    assert_eq!(json["message"], "Room not found");
}

#[tokio::test]
async fn create_room_requires_token() {
    let resp = app()
        .oneshot(json_request("POST", "/rooms", None, ROOM))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json: Value = body_json(resp).await;
    assert_eq!(json["message"], "Unauthenticated.");
}

#[tokio::test]
async fn create_room_requires_admin() {
    let mut app = app();
    let (token, _) = guest_token(&mut app, "guest@hotel.test").await;
    let resp = call(&mut app, json_request("POST", "/rooms", Some(&token), ROOM)).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn room_crud_lifecycle() {
    let mut app = app();
    let token = admin_token(&mut app).await;

    // create
    let resp = call(&mut app, json_request("POST", "/rooms", Some(&token), ROOM)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json: Value = body_json(resp).await;
    let room: Room = serde_json::from_value(json["data"].clone()).unwrap();
    assert_eq!(room.bed_size, "queen");
    let id = room.id;

    // update
    let updated = ROOM.replace("Garden", "Garden Deluxe");
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/rooms/{id}"), Some(&token), &updated),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = body_json(resp).await;
    assert_eq!(json["data"]["name"], "Garden Deluxe");

    // delete
    let resp = call(
        &mut app,
        json_request("DELETE", &format!("/rooms/{id}"), Some(&token), ""),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete — 404
    let resp = call(&mut app, get(&format!("/rooms/{id}"), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth ---

#[tokio::test]
async fn signup_validation_errors() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/signup",
            None,
            r#"{"username":"","email":"a@b.c","password":"one","password_confirmation":"two"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = body_json(resp).await;
    assert_eq!(json["message"], "The given data was invalid.");
    assert!(json["errors"]["username"].is_array());
    assert!(json["errors"]["password"].is_array());
}

#[tokio::test]
async fn login_with_wrong_password_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/login",
            None,
            &format!(r#"{{"email":"{ADMIN_EMAIL}","password":"nope","role":"admin"}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_token() {
    let mut app = app();
    let (token, _) = guest_token(&mut app, "leaving@hotel.test").await;

    let resp = call(&mut app, json_request("POST", "/logout", Some(&token), "{}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = call(&mut app, get("/bookings", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- bookings ---

#[tokio::test]
async fn booking_lifecycle_and_ownership() {
    let mut app = app();
    let admin = admin_token(&mut app).await;
    let resp = call(&mut app, json_request("POST", "/rooms", Some(&admin), ROOM)).await;
    let json: Value = body_json(resp).await;
    let room_id = json["data"]["id"].as_i64().unwrap();

    let (owner, owner_user) = guest_token(&mut app, "owner@hotel.test").await;
    let (other, _) = guest_token(&mut app, "other@hotel.test").await;

    // create
    let body = format!(
        r#"{{"room_id":{room_id},"check_in":"2024-09-15","check_out":"2024-09-18","guests":2,"package":"Gold","housekeeping":true,"housekeeping_time":"10:00","parking":false}}"#
    );
    let resp = call(&mut app, json_request("POST", "/bookings", Some(&owner), &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json: Value = body_json(resp).await;
    let booking: Booking = serde_json::from_value(json["data"].clone()).unwrap();
    assert_eq!(booking.status, "pending");
    assert_eq!(booking.total_price, 360.0);
    assert_eq!(booking.user_id, owner_user.id);
    let id = booking.id;

    // someone else's booking — 403
    let resp = call(&mut app, get(&format!("/bookings/{id}"), Some(&other))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // other user's list is empty
    let resp = call(&mut app, get("/bookings", Some(&other))).await;
    let json: Value = body_json(resp).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    // delete answers 200 with a message
    let resp = call(
        &mut app,
        json_request("DELETE", &format!("/bookings/{id}"), Some(&owner), ""),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, get(&format!("/bookings/{id}"), Some(&owner))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_with_reversed_dates_is_rejected() {
    let mut app = app();
    let admin = admin_token(&mut app).await;
    let resp = call(&mut app, json_request("POST", "/rooms", Some(&admin), ROOM)).await;
    let json: Value = body_json(resp).await;
    let room_id = json["data"]["id"].as_i64().unwrap();

    let body = format!(
        r#"{{"room_id":{room_id},"check_in":"2024-09-18","check_out":"2024-09-15","guests":1}}"#
    );
    let resp = call(&mut app, json_request("POST", "/bookings", Some(&admin), &body)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = body_json(resp).await;
    assert!(json["errors"]["check_out"].is_array());
}

// --- profile ---

#[tokio::test]
async fn profile_is_private() {
    let mut app = app();
    let (token, user) = guest_token(&mut app, "me@hotel.test").await;
    let (_, stranger) = guest_token(&mut app, "stranger@hotel.test").await;

    let resp = call(&mut app, get(&format!("/user/{}", user.id), Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, get(&format!("/user/{}", stranger.id), Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call(
        &mut app,
        json_request(
            "PUT",
            &format!("/user/{}", user.id),
            Some(&token),
            r#"{"username":"renamed","phone":"777"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = body_json(resp).await;
    assert_eq!(json["data"]["username"], "renamed");
    assert_eq!(json["data"]["email"], "me@hotel.test");
}
