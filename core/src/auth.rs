//! Bearer credential held by a single client.

/// The current session token, if any.
///
/// Owned by one `HotelClient` and mutated only through `&mut` access, so two
/// clients never share a session.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    token: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Store `token`. An empty string clears the state instead.
    pub fn set(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
    }

    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
