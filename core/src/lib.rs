//! Blocking client core for the hotel rooms and bookings API.
//!
//! # Overview
//! `HotelClient` exposes one method per resource action (auth, rooms,
//! bookings, profile). Each call flows through the same stages:
//! `RequestBuilder` produces an `HttpRequest`, a `Transport` executes it, the
//! validator checks the status and parses the body, and the codec unwraps the
//! `{"data": ...}` envelope into typed DTOs.
//!
//! # Design
//! - The bearer token lives in an `AuthState` owned by one client instance;
//!   there is no process-wide session.
//! - `Transport` is the only stage that performs I/O. `UreqTransport` is the
//!   default; tests inject scripted transports.
//! - Failures are `ApiError` values and are logged through `tracing` as they
//!   are returned. Nothing panics across the client boundary.

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;
pub mod types;
pub mod validate;

pub use auth::AuthState;
pub use client::{HotelClient, LogoutOutcome, DEFAULT_ROLE};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, RawOutcome};
pub use request::RequestBuilder;
pub use transport::{Transport, UreqTransport};
pub use types::{Booking, BookingData, NewAccount, Room, RoomData, User};
