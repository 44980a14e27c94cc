//! In-memory stand-in for the hotel backend.
//!
//! Speaks the same wire contract as the real API: entities wrapped in
//! `{"data": ...}`, failures as `{"message": ..., "errors": ...}`, bearer
//! tokens in `Authorization`. One administrator account is seeded so room
//! management can be exercised.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@hotel.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    #[serde(rename = "bedSize")]
    pub bed_size: String,
    pub view: String,
    pub capacity: u32,
    pub description: String,
    pub amenities: Vec<String>,
    pub image: String,
    pub available: bool,
}

#[derive(Deserialize)]
pub struct RoomInput {
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    pub bed_size: String,
    #[serde(default)]
    pub view: String,
    pub capacity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_true")]
    pub available: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub role: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub room_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub status: String,
    pub package: String,
    pub housekeeping: bool,
    pub housekeeping_time: String,
    pub parking: bool,
    pub total_price: f64,
}

#[derive(Deserialize)]
pub struct BookingInput {
    pub room_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub housekeeping: bool,
    #[serde(default)]
    pub housekeeping_time: String,
    #[serde(default)]
    pub parking: bool,
}

#[derive(Deserialize)]
pub struct SignupInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub age: u32,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Deserialize)]
pub struct ProfileInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<i64, Account>,
    tokens: HashMap<String, i64>,
    rooms: BTreeMap<i64, Room>,
    bookings: BTreeMap<i64, Booking>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn seeded() -> Self {
        let mut store = Store::default();
        let id = store.next_id();
        store.accounts.insert(
            id,
            Account {
                user: User {
                    id,
                    username: "admin".to_string(),
                    email: ADMIN_EMAIL.to_string(),
                    phone: String::new(),
                    age: 0,
                    role: "admin".to_string(),
                },
                password: ADMIN_PASSWORD.to_string(),
            },
        );
        store
    }

    fn issue_token(&mut self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<User, Failure> {
        bearer(headers)
            .and_then(|token| self.tokens.get(token))
            .and_then(|id| self.accounts.get(id))
            .map(|account| account.user.clone())
            .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Unauthenticated."))
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room).put(update_room).delete(delete_room))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{id}", get(get_booking).delete(delete_booking))
        .route("/user/{id}", get(get_profile).put(update_profile))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- auth ---

async fn signup(State(db): State<Db>, Json(input): Json<SignupInput>) -> Result<Response, Failure> {
    let mut store = db.write().await;

    let mut errors = Map::new();
    for (field, value) in [
        ("username", &input.username),
        ("email", &input.email),
        ("password", &input.password),
    ] {
        if value.trim().is_empty() {
            errors.insert(field.to_string(), json!([format!("The {field} field is required.")]));
        }
    }
    if input.password != input.password_confirmation {
        errors.insert(
            "password".to_string(),
            json!(["The password field confirmation does not match."]),
        );
    }
    if store.accounts.values().any(|a| a.user.email == input.email) {
        errors.insert("email".to_string(), json!(["The email has already been taken."]));
    }
    if !errors.is_empty() {
        return Err(validation_failure(errors));
    }

    let id = store.next_id();
    let user = User {
        id,
        username: input.username,
        email: input.email,
        phone: input.phone,
        age: input.age,
        role: "user".to_string(),
    };
    store.accounts.insert(
        id,
        Account {
            user: user.clone(),
            password: input.password,
        },
    );
    let token = store.issue_token(id);
    info!(id, "account created");
    Ok((StatusCode::CREATED, Json(json!({"token": token, "data": user}))).into_response())
}

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Result<Response, Failure> {
    let mut store = db.write().await;
    let user = store
        .accounts
        .values()
        .find(|a| a.user.email == input.email && a.password == input.password && a.user.role == input.role)
        .map(|a| a.user.clone())
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let token = store.issue_token(user.id);
    Ok(Json(json!({"token": token, "user": user})).into_response())
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store.authenticate(&headers)?;
    if let Some(token) = bearer(&headers) {
        store.tokens.remove(token);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- rooms ---

async fn list_rooms(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let rooms: Vec<&Room> = store.rooms.values().collect();
    Json(json!({ "data": rooms }))
}

async fn get_room(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Value>, Failure> {
    let store = db.read().await;
    let room = store.rooms.get(&id).ok_or_else(|| not_found("Room"))?;
    Ok(Json(json!({ "data": room })))
}

async fn create_room(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<RoomInput>,
) -> Result<Response, Failure> {
    let mut store = db.write().await;
    require_admin(&store.authenticate(&headers)?)?;
    let id = store.next_id();
    let room = room_from_input(id, input);
    store.rooms.insert(id, room.clone());
    Ok((StatusCode::CREATED, Json(json!({ "data": room }))).into_response())
}

async fn update_room(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<RoomInput>,
) -> Result<Json<Value>, Failure> {
    let mut store = db.write().await;
    require_admin(&store.authenticate(&headers)?)?;
    let room = store.rooms.get_mut(&id).ok_or_else(|| not_found("Room"))?;
    *room = room_from_input(id, input);
    Ok(Json(json!({ "data": room })))
}

async fn delete_room(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    require_admin(&store.authenticate(&headers)?)?;
    store
        .rooms
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("Room"))
}

// --- bookings ---

async fn list_bookings(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    let store = db.read().await;
    let user = store.authenticate(&headers)?;
    let bookings: Vec<&Booking> = store
        .bookings
        .values()
        .filter(|b| is_admin(&user) || b.user_id == user.id)
        .collect();
    Ok(Json(json!({ "data": bookings })))
}

async fn create_booking(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<BookingInput>,
) -> Result<Response, Failure> {
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;

    let room = store.rooms.get(&input.room_id).cloned().ok_or_else(|| {
        validation_failure(field_error("room_id", "The selected room id is invalid."))
    })?;
    if !room.available {
        return Err(failure(StatusCode::UNPROCESSABLE_ENTITY, "Room is not available"));
    }
    let nights = nights_between(&input.check_in, &input.check_out)?;
    if input.guests == 0 || input.guests > room.capacity {
        return Err(validation_failure(field_error(
            "guests",
            "The guests count exceeds the room capacity.",
        )));
    }

    let id = store.next_id();
    let booking = Booking {
        id,
        user_id: user.id,
        room_id: room.id,
        check_in: input.check_in,
        check_out: input.check_out,
        guests: input.guests,
        status: "pending".to_string(),
        package: input.package,
        housekeeping: input.housekeeping,
        housekeeping_time: input.housekeeping_time,
        parking: input.parking,
        total_price: room.price * nights as f64,
    };
    store.bookings.insert(id, booking.clone());
    Ok((StatusCode::CREATED, Json(json!({ "data": booking }))).into_response())
}

async fn get_booking(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Failure> {
    let store = db.read().await;
    let user = store.authenticate(&headers)?;
    let booking = store.bookings.get(&id).ok_or_else(|| not_found("Booking"))?;
    if !is_admin(&user) && booking.user_id != user.id {
        return Err(forbidden());
    }
    Ok(Json(json!({ "data": booking })))
}

/// Answers 200 with a message rather than 204, as some deployments do.
async fn delete_booking(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Failure> {
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;
    let booking = store.bookings.get(&id).ok_or_else(|| not_found("Booking"))?;
    if !is_admin(&user) && booking.user_id != user.id {
        return Err(forbidden());
    }
    store.bookings.remove(&id);
    Ok(Json(json!({ "message": "Booking deleted" })))
}

// --- profile ---

async fn get_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Failure> {
    let store = db.read().await;
    let user = store.authenticate(&headers)?;
    if !is_admin(&user) && user.id != id {
        return Err(forbidden());
    }
    let account = store.accounts.get(&id).ok_or_else(|| not_found("User"))?;
    Ok(Json(json!({ "data": account.user })))
}

async fn update_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<Value>, Failure> {
    let mut store = db.write().await;
    let user = store.authenticate(&headers)?;
    if !is_admin(&user) && user.id != id {
        return Err(forbidden());
    }
    let account = store.accounts.get_mut(&id).ok_or_else(|| not_found("User"))?;
    if let Some(username) = input.username {
        account.user.username = username;
    }
    if let Some(email) = input.email {
        account.user.email = email;
    }
    if let Some(phone) = input.phone {
        account.user.phone = phone;
    }
    if let Some(age) = input.age {
        account.user.age = age;
    }
    Ok(Json(json!({ "data": account.user })))
}

// --- helpers ---

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn is_admin(user: &User) -> bool {
    user.role == "admin"
}

fn require_admin(user: &User) -> Result<(), Failure> {
    if is_admin(user) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

fn room_from_input(id: i64, input: RoomInput) -> Room {
    Room {
        id,
        name: input.name,
        room_type: input.room_type,
        price: input.price,
        bed_size: input.bed_size,
        view: input.view,
        capacity: input.capacity,
        description: input.description,
        amenities: input.amenities,
        image: input.image,
        available: input.available,
    }
}

fn nights_between(check_in: &str, check_out: &str) -> Result<i64, Failure> {
    let parse = |field: &str, value: &str| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            validation_failure(field_error(field, "The date must be formatted as YYYY-MM-DD."))
        })
    };
    let start = parse("check_in", check_in)?;
    let end = parse("check_out", check_out)?;
    let nights = (end - start).num_days();
    if nights <= 0 {
        return Err(validation_failure(field_error(
            "check_out",
            "The check out must be a date after check in.",
        )));
    }
    Ok(nights)
}

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "message": message })))
}

fn not_found(what: &str) -> Failure {
    failure(StatusCode::NOT_FOUND, &format!("{what} not found"))
}

fn forbidden() -> Failure {
    failure(StatusCode::FORBIDDEN, "This action is unauthorized.")
}

fn field_error(field: &str, message: &str) -> Map<String, Value> {
    let mut errors = Map::new();
    errors.insert(field.to_string(), json!([message]));
    errors
}

fn validation_failure(errors: Map<String, Value>) -> Failure {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "The given data was invalid.", "errors": errors })),
    )
}

fn default_true() -> bool {
    true
}

fn default_role() -> String {
    "user".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_serializes_with_wire_keys() {
        let room = room_from_input(
            1,
            serde_json::from_value(json!({
                "name": "Garden", "type": "double", "price": 120.0,
                "bed_size": "queen", "capacity": 2
            }))
            .unwrap(),
        );
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["bedSize"], "queen");
        assert_eq!(json["type"], "double");
        assert_eq!(json["available"], true);
    }

    #[test]
    fn booking_serializes_camel_case() {
        let booking = Booking {
            id: 1,
            user_id: 2,
            room_id: 3,
            check_in: "2024-09-15".to_string(),
            check_out: "2024-09-18".to_string(),
            guests: 2,
            status: "pending".to_string(),
            package: String::new(),
            housekeeping: false,
            housekeeping_time: String::new(),
            parking: true,
            total_price: 360.0,
        };
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["totalPrice"], 360.0);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn nights_are_counted_between_dates() {
        assert_eq!(nights_between("2024-09-15", "2024-09-18").unwrap(), 3);
    }

    #[test]
    fn nights_reject_reversed_or_bad_dates() {
        let (status, _) = nights_between("2024-09-18", "2024-09-15").unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(nights_between("15/09/2024", "2024-09-18").is_err());
    }

    #[test]
    fn login_input_defaults_role_to_user() {
        let input: LoginInput =
            serde_json::from_str(r#"{"email":"a@b.c","password":"x"}"#).unwrap();
        assert_eq!(input.role, "user");
    }

    #[test]
    fn bearer_strips_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer(&headers), Some("abc"));
        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer(&headers), None);
    }
}
