//! Domain DTOs for the hotel API and their JSON field maps.
//!
//! # Design
//! The serde attributes on each type are the wire contract: response types
//! (`Room`, `Booking`, `User`) use the backend's camelCase keys, while the
//! create/update payloads (`RoomData`, `BookingData`) use the snake_case keys
//! the backend validates on input.
//!
//! Decoding is strict about identity and lenient about everything else. `id`
//! must be present on every response entity; any other field that is
//! missing or `null` falls back to its zero value (`""`, `0`, `false`, `[]`),
//! except `Room::available`, which falls back to `true`. Monetary amounts
//! accept numeric strings such as `"150.00"`.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A room as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub room_type: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: f64,
    #[serde(rename = "bedSize", default, deserialize_with = "null_as_default")]
    pub bed_size: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub available: bool,
}

/// Payload for creating or replacing a room. The backend assigns `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomData {
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    pub bed_size: String,
    pub view: String,
    pub capacity: u32,
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl From<&Room> for RoomData {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            room_type: room.room_type.clone(),
            price: room.price,
            bed_size: room.bed_size.clone(),
            view: room.view.clone(),
            capacity: room.capacity,
            description: room.description.clone(),
            amenities: room.amenities.clone(),
            image: room.image.clone(),
            available: room.available,
        }
    }
}

/// A user profile. Passwords never travel in this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

/// A booking as returned by the API. `status` and `total_price` are computed
/// by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_in: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_out: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub guests: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub package: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub housekeeping: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub housekeeping_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parking: bool,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_price: f64,
}

/// Payload for creating a booking. The booking's owner is the authenticated
/// user, so no user id is sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingData {
    pub room_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub package: String,
    pub housekeeping: bool,
    /// Only meaningful when `housekeeping` is set.
    #[serde(default)]
    pub housekeeping_time: String,
    pub parking: bool,
}

/// Details for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub age: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
    pub phone: &'a str,
    pub age: u32,
}

impl<'a> From<&'a NewAccount> for SignupRequest<'a> {
    fn from(account: &'a NewAccount) -> Self {
        Self {
            username: &account.username,
            email: &account.email,
            password: &account.password,
            password_confirmation: &account.password,
            phone: &account.phone,
            age: account.age,
        }
    }
}

/// The editable subset of a profile. `id` and `role` are never sent.
#[derive(Debug, Serialize)]
pub(crate) struct ProfileUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub age: u32,
}

impl<'a> From<&'a User> for ProfileUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            username: &user.username,
            email: &user.email,
            phone: &user.phone,
            age: user.age,
        }
    }
}

fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Amount::Number(n)) => Ok(n),
        Some(Amount::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid amount: {s:?}"))),
    }
}
