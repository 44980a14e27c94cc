//! The hotel API facade.
//!
//! # Design
//! `HotelClient` owns the session token, a `RequestBuilder` for its base URL,
//! and a `Transport`. Every operation runs the same pipeline: check the auth
//! precondition, build the request, execute it, validate the status, and
//! decode the envelope. The first failing stage ends the operation and its
//! error is logged before being returned, so callers that only care about
//! success can `.ok()` the result while the diagnostic still reaches the log.
//!
//! Destructive operations and logout expect 204 but also accept 200. When
//! the first answer is some other status the request is sent once more,
//! expecting 200. Transport failures are never retried.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::AuthState;
use crate::codec::{decode_data, decode_data_list, decode_optional_data, encode};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::HttpMethod;
use crate::request::RequestBuilder;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Booking, BookingData, LoginRequest, NewAccount, ProfileUpdate, Room, RoomData,
    SignupRequest, User,
};
use crate::validate::validate;

const OK: u16 = 200;
const CREATED: u16 = 201;
const NO_CONTENT: u16 = 204;

/// Role sent by [`HotelClient::login`].
pub const DEFAULT_ROLE: &str = "user";

/// How a logout ended. The local token is cleared in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The server acknowledged the logout.
    Confirmed,
    /// The server did not acknowledge it, or there was no session to end.
    LocalOnly,
}

/// Blocking client for the hotel API. One instance holds one session.
pub struct HotelClient<T = UreqTransport> {
    requests: RequestBuilder,
    auth: AuthState,
    transport: T,
}

impl HotelClient<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::default())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_transport(
            &config.base_url,
            UreqTransport::new(config.timeout),
        ))
    }
}

impl<T: Transport> HotelClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        let requests = RequestBuilder::new(base_url);
        debug!(base_url = requests.base_url(), "client initialized");
        Self {
            requests,
            auth: AuthState::new(),
            transport,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    #[cfg(test)]
    fn transport(&self) -> &T {
        &self.transport
    }

    // --- authentication ---

    /// Log in with the default `"user"` role.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Option<User>> {
        self.login_as(email, password, DEFAULT_ROLE)
    }

    /// Log in and store the returned token. Returns the user record when the
    /// server includes one.
    ///
    /// Any failure, including a 200 without a token, leaves the client
    /// unauthenticated.
    pub fn login_as(&mut self, email: &str, password: &str, role: &str) -> Result<Option<User>> {
        let result = self.try_login(email, password, role);
        if result.is_err() {
            self.auth.clear();
        }
        logged("login", result)
    }

    fn try_login(&mut self, email: &str, password: &str, role: &str) -> Result<Option<User>> {
        let payload = encode(&LoginRequest {
            email,
            password,
            role,
        })?;
        let response = self.send(HttpMethod::Post, "/login", Some(payload), OK, false)?;
        let token = extract_token(&response).ok_or_else(|| {
            ApiError::SchemaMismatch("login response carries no token".to_string())
        })?;
        self.auth.set(token);
        info!(email, role, "logged in");
        Ok(extract_user(&response))
    }

    /// Register a new account. Returns `true` when the server also issued a
    /// token and the client is now logged in.
    pub fn signup(&mut self, account: &NewAccount) -> Result<bool> {
        let result = encode(&SignupRequest::from(account)).and_then(|payload| {
            self.send(HttpMethod::Post, "/signup", Some(payload), CREATED, false)
        });
        let response = logged("signup", result)?;
        match extract_token(&response) {
            Some(token) => {
                self.auth.set(token);
                info!(email = %account.email, "signed up and logged in");
                Ok(true)
            }
            None => {
                info!(email = %account.email, "signed up; login required");
                Ok(false)
            }
        }
    }

    /// End the session. The local token is always discarded, whatever the
    /// server says.
    pub fn logout(&mut self) -> LogoutOutcome {
        if !self.auth.is_authenticated() {
            debug!("logout without a session");
            return LogoutOutcome::LocalOnly;
        }
        let result = self.send_with_fallback(HttpMethod::Post, "/logout", Some(json!({})));
        self.auth.clear();
        match result {
            Ok(_) => {
                info!("logged out");
                LogoutOutcome::Confirmed
            }
            Err(e) => {
                warn!(error = %e, "logout not confirmed by server; token cleared locally");
                LogoutOutcome::LocalOnly
            }
        }
    }

    // --- rooms ---

    pub fn rooms(&self) -> Result<Vec<Room>> {
        let result = self
            .send(HttpMethod::Get, "/rooms", None, OK, false)
            .and_then(decode_data_list);
        logged("list rooms", result)
    }

    pub fn room(&self, id: i64) -> Result<Room> {
        let result = self
            .send(HttpMethod::Get, &format!("/rooms/{id}"), None, OK, false)
            .and_then(decode_data);
        logged("get room", result)
    }

    pub fn create_room(&self, room: &RoomData) -> Result<Room> {
        let result = self.require_auth().and_then(|()| {
            let payload = encode(room)?;
            let response = self.send(HttpMethod::Post, "/rooms", Some(payload), CREATED, true)?;
            decode_data(response)
        });
        logged("create room", result)
    }

    /// Replace a room. The server may or may not echo the updated room.
    pub fn update_room(&self, id: i64, room: &RoomData) -> Result<Option<Room>> {
        let result = self.require_auth().and_then(|()| {
            let payload = encode(room)?;
            let path = format!("/rooms/{id}");
            let response = self.send(HttpMethod::Put, &path, Some(payload), OK, true)?;
            decode_optional_data(response)
        });
        logged("update room", result)
    }

    pub fn delete_room(&self, id: i64) -> Result<()> {
        let result = self.require_auth().and_then(|()| {
            self.send_with_fallback(HttpMethod::Delete, &format!("/rooms/{id}"), None)
        });
        let result = logged("delete room", result.map(drop));
        if result.is_ok() {
            info!(id, "room deleted");
        }
        result
    }

    // --- bookings ---

    pub fn create_booking(&self, booking: &BookingData) -> Result<Booking> {
        let result = self.require_auth().and_then(|()| {
            let payload = encode(booking)?;
            let response =
                self.send(HttpMethod::Post, "/bookings", Some(payload), CREATED, true)?;
            decode_data(response)
        });
        logged("create booking", result)
    }

    /// Bookings visible to the logged-in user.
    pub fn bookings(&self) -> Result<Vec<Booking>> {
        let result = self
            .require_auth()
            .and_then(|()| self.send(HttpMethod::Get, "/bookings", None, OK, true))
            .and_then(decode_data_list);
        logged("list bookings", result)
    }

    pub fn booking(&self, id: i64) -> Result<Booking> {
        let result = self
            .require_auth()
            .and_then(|()| self.send(HttpMethod::Get, &format!("/bookings/{id}"), None, OK, true))
            .and_then(decode_data);
        logged("get booking", result)
    }

    pub fn delete_booking(&self, id: i64) -> Result<()> {
        let result = self.require_auth().and_then(|()| {
            self.send_with_fallback(HttpMethod::Delete, &format!("/bookings/{id}"), None)
        });
        let result = logged("delete booking", result.map(drop));
        if result.is_ok() {
            info!(id, "booking deleted");
        }
        result
    }

    // --- profile ---

    pub fn profile(&self, id: i64) -> Result<User> {
        let result = self
            .require_auth()
            .and_then(|()| self.send(HttpMethod::Get, &format!("/user/{id}"), None, OK, true))
            .and_then(decode_data);
        logged("get profile", result)
    }

    /// Update the editable profile fields (username, email, phone, age) of
    /// user `id` from `user`. `user.id` and `user.role` are not sent.
    pub fn update_profile(&self, id: i64, user: &User) -> Result<Option<User>> {
        let result = self.require_auth().and_then(|()| {
            let payload = encode(&ProfileUpdate::from(user))?;
            let path = format!("/user/{id}");
            let response = self.send(HttpMethod::Put, &path, Some(payload), OK, true)?;
            decode_optional_data(response)
        });
        logged("update profile", result)
    }

    // --- pipeline ---

    fn require_auth(&self) -> Result<()> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::AuthRequired)
        }
    }

    fn send(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
        expected: u16,
        requires_auth: bool,
    ) -> Result<Value> {
        let request =
            self.requests
                .build(method, path, payload.as_ref(), requires_auth, &self.auth)?;
        let outcome = self.transport.execute(&request);
        validate(&outcome, expected)
    }

    /// Expect 204; a 200 on the first answer is accepted as is. Any other
    /// status repeats the request once, now expecting 200.
    fn send_with_fallback(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
    ) -> Result<Value> {
        let request = self
            .requests
            .build(method, path, payload.as_ref(), true, &self.auth)?;
        let outcome = self.transport.execute(&request);
        match validate(&outcome, NO_CONTENT) {
            Err(e) if e.is_status_mismatch() => {
                if outcome.status == OK {
                    return validate(&outcome, OK);
                }
                debug!(%method, path, error = %e, "no 204, retrying expecting 200");
                validate(&self.transport.execute(&request), OK)
            }
            other => other,
        }
    }
}

fn logged<R>(operation: &'static str, result: Result<R>) -> Result<R> {
    if let Err(e) = &result {
        warn!(operation, error = %e, "request failed");
    }
    result
}

fn extract_token(response: &Value) -> Option<String> {
    response
        .get("token")
        .or_else(|| response.pointer("/data/token"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// The user record some login responses include; ignored when malformed.
fn extract_user(response: &Value) -> Option<User> {
    let user = response
        .get("user")
        .or_else(|| response.pointer("/data/user"))?;
    serde_json::from_value(user.clone()).ok()
}
