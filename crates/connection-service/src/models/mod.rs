//! Connection Service models.
//!
//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Room used when the `room` query parameter is absent.
pub const DEFAULT_ROOM: &str = "dev";

/// Participant identity used when the `identity` query parameter is absent.
pub const DEFAULT_IDENTITY: &str = "guest";

/// Query parameters for `GET /api/connection-details`.
///
/// Only absence of a key triggers its default. `?room=` and a bare `?room`
/// both yield `Some("")`, which is passed through unchanged. When a key is
/// repeated the first value wins; unknown keys are ignored.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct ConnectionDetailsParams {
    pub room: Option<String>,
    pub identity: Option<String>,
}

impl ConnectionDetailsParams {
    /// Build params from decoded query pairs, in request order.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "room" => &mut params.room,
                "identity" => &mut params.identity,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Resolve `(room, identity)`, applying defaults for absent keys.
    pub fn into_parts(self) -> (String, String) {
        let room = self.room.unwrap_or_else(|| DEFAULT_ROOM.to_string());
        let identity = self
            .identity
            .unwrap_or_else(|| DEFAULT_IDENTITY.to_string());
        (room, identity)
    }
}

/// Identity is redacted in Debug output.
impl fmt::Debug for ConnectionDetailsParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDetailsParams")
            .field("room", &self.room)
            .field("identity", &self.identity.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Response for `GET /api/connection-details`.
///
/// This is the shape front-end consumers deserialize. It carries exactly
/// three fields; the API secret is never part of it.
///
/// ```json
/// {
///   "serverUrl": "wss://media.example.com",
///   "apiKey": "APIexamplekey",
///   "participantToken": "eyJhbGciOiJIUzI1NiIs..."
/// }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConnectionDetails {
    /// Media server URL.
    pub server_url: String,

    /// API key the token was issued under.
    pub api_key: String,

    /// Signed access token. Redacted in Debug output.
    pub participant_token: String,
}

impl fmt::Debug for ConnectionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDetails")
            .field("server_url", &self.server_url)
            .field("api_key", &self.api_key)
            .field("participant_token", &"[REDACTED]")
            .finish()
    }
}

/// Readiness probe response.
///
/// Returned by the `/ready` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: String,

    /// Signing key status ("configured" or "missing").
    pub signing_keys: String,
}
