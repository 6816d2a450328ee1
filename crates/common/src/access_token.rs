//! Room access tokens.
//!
//! An access token is an HS256 JWT that binds a participant identity to a
//! [`VideoGrant`]. The claim layout follows the LiveKit wire format so the
//! media server can verify tokens with the same API key/secret pair:
//!
//! ```json
//! {
//!   "iss": "<api key>",
//!   "sub": "<identity>",
//!   "jti": "<identity>",
//!   "nbf": 1700000000,
//!   "exp": 1700021600,
//!   "video": { "room": "dev", "roomJoin": true }
//! }
//! ```
//!
//! # Usage
//!
//! ```rust
//! use common::access_token::{verify_access_token, AccessToken, VideoGrant};
//! use common::secret::SecretString;
//!
//! let secret = SecretString::from("devsecret");
//! let token = AccessToken::with_api_key("devkey", &secret)
//!     .with_identity("alice")
//!     .with_grant(VideoGrant::room_join("studio-1"))
//!     .to_jwt()
//!     .unwrap();
//!
//! let claims = verify_access_token(&token, &secret).unwrap();
//! assert_eq!(claims.sub, "alice");
//! assert_eq!(claims.video.room, "studio-1");
//! ```
//!
//! # Security
//!
//! - The API secret never leaves its `SecretString` except to build the
//!   encoding/decoding key
//! - `sub` and `jti` carry the participant identity and are redacted in
//!   `Debug` output
//! - Tokens are size-checked before any parsing on the verify path

use crate::secret::{ExposeSecret, SecretString};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

// =============================================================================
// Constants
// =============================================================================

/// Default token lifetime (6 hours), matching the LiveKit server SDKs.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Maximum accepted token size on the verify path (8KB).
///
/// A room token with a single grant is ~300 bytes.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Clock skew tolerance applied to `nbf`/`exp` during verification.
pub const VERIFY_LEEWAY: Duration = Duration::from_secs(60);

// =============================================================================
// Error Types
// =============================================================================

/// Errors produced while issuing or verifying access tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessTokenError {
    /// API key or secret is empty.
    #[error("API key and secret must be set")]
    InvalidKeys,

    /// The JWT encoder rejected the claims or key.
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// The token is malformed, expired, or signed with another secret.
    #[error("Token verification failed: {0}")]
    Verification(String),
}

// =============================================================================
// Grant and Claims Types
// =============================================================================

/// Room capabilities carried in the `video` claim.
///
/// Serialized camelCase (`{"room": "...", "roomJoin": true}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    /// Room the grant applies to.
    #[serde(default)]
    pub room: String,

    /// Permission to join `room`.
    #[serde(default)]
    pub room_join: bool,
}

impl VideoGrant {
    /// Grant that allows joining `room`.
    #[must_use]
    pub fn room_join(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            room_join: true,
        }
    }
}

/// Claims embedded in a room access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Issuer: the API key.
    pub iss: String,

    /// Subject: the participant identity. Redacted in Debug output.
    pub sub: String,

    /// Token ID. Set to the participant identity. Redacted in Debug output.
    pub jti: String,

    /// Not-before timestamp (Unix epoch seconds).
    pub nbf: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Room grant.
    pub video: VideoGrant,
}

impl fmt::Debug for AccessTokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenClaims")
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("jti", &"[REDACTED]")
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("video", &self.video)
            .finish()
    }
}

// =============================================================================
// Token Builder
// =============================================================================

/// Builder for a signed room access token.
#[derive(Clone)]
pub struct AccessToken {
    api_key: String,
    api_secret: SecretString,
    identity: String,
    grant: VideoGrant,
    ttl: Duration,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("identity", &"[REDACTED]")
            .field("grant", &self.grant)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl AccessToken {
    /// Start a token issued by `api_key` and signed with `api_secret`.
    #[must_use]
    pub fn with_api_key(api_key: &str, api_secret: &SecretString) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.clone(),
            identity: String::new(),
            grant: VideoGrant::default(),
            ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Set the participant identity (`sub` and `jti`).
    #[must_use]
    pub fn with_identity(mut self, identity: &str) -> Self {
        self.identity = identity.to_string();
        self
    }

    /// Set the room grant.
    #[must_use]
    pub fn with_grant(mut self, grant: VideoGrant) -> Self {
        self.grant = grant;
        self
    }

    /// Set the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign the token.
    ///
    /// # Errors
    ///
    /// - `InvalidKeys` - API key or secret is empty
    /// - `Signing` - TTL out of range or the encoder failed
    #[instrument(skip_all)]
    pub fn to_jwt(&self) -> Result<String, AccessTokenError> {
        if self.api_key.is_empty() || self.api_secret.expose_secret().is_empty() {
            return Err(AccessTokenError::InvalidKeys);
        }

        let ttl_secs = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AccessTokenError::Signing("TTL out of range".to_string()))?;
        let now = Utc::now().timestamp();

        let claims = AccessTokenClaims {
            iss: self.api_key.clone(),
            sub: self.identity.clone(),
            jti: self.identity.clone(),
            nbf: now,
            exp: now.saturating_add(ttl_secs),
            video: self.grant.clone(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        let encoding_key = EncodingKey::from_secret(self.api_secret.expose_secret().as_bytes());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AccessTokenError::Signing(format!("JWT encoding failed: {e}")))
    }
}

// =============================================================================
// Verification
// =============================================================================

/// Verify a room access token and return its claims.
///
/// Checks size, HS256 signature, `exp` and `nbf` (with [`VERIFY_LEEWAY`]).
///
/// # Errors
///
/// Returns `AccessTokenError::Verification` if the token is oversized,
/// malformed, expired, not yet valid, or signed with a different secret.
#[instrument(skip_all)]
pub fn verify_access_token(
    token: &str,
    api_secret: &SecretString,
) -> Result<AccessTokenClaims, AccessTokenError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        return Err(AccessTokenError::Verification(
            "token exceeds maximum size".to_string(),
        ));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = VERIFY_LEEWAY.as_secs();
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

    let decoding_key = DecodingKey::from_secret(api_secret.expose_secret().as_bytes());

    decode::<AccessTokenClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AccessTokenError::Verification(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn secret() -> SecretString {
        SecretString::from("test-api-secret-0123456789")
    }

    fn issue(identity: &str, room: &str) -> String {
        AccessToken::with_api_key("APItestkey", &secret())
            .with_identity(identity)
            .with_grant(VideoGrant::room_join(room))
            .to_jwt()
            .expect("token should sign")
    }

    #[test]
    fn test_sign_and_verify_round_trip_claims() {
        let token = issue("alice", "studio-1");
        let claims = verify_access_token(&token, &secret()).unwrap();

        assert_eq!(claims.iss, "APItestkey");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.jti, "alice");
        assert_eq!(claims.video, VideoGrant::room_join("studio-1"));
    }

    #[test]
    fn test_default_ttl_is_six_hours() {
        let token = issue("guest", "dev");
        let claims = verify_access_token(&token, &secret()).unwrap();

        assert_eq!(claims.exp - claims.nbf, 6 * 60 * 60);
    }

    #[test]
    fn test_custom_ttl() {
        let token = AccessToken::with_api_key("APItestkey", &secret())
            .with_identity("bob")
            .with_grant(VideoGrant::room_join("dev"))
            .with_ttl(Duration::from_secs(600))
            .to_jwt()
            .unwrap();

        let claims = verify_access_token(&token, &secret()).unwrap();
        assert_eq!(claims.exp - claims.nbf, 600);
    }

    #[test]
    fn test_header_is_hs256_jwt() {
        let token = issue("alice", "dev");
        let header = jsonwebtoken::decode_header(&token).unwrap();

        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn test_video_claim_wire_format() {
        let token = issue("alice", "studio-1");
        let payload_b64 = token.split('.').nth(1).unwrap();
        let payload = URL_SAFE_NO_PAD.decode(payload_b64).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();

        assert_eq!(json["video"]["room"], "studio-1");
        assert_eq!(json["video"]["roomJoin"], true);
        assert!(json["video"].get("room_join").is_none());
    }

    #[test]
    fn test_payload_does_not_contain_secret() {
        let token = issue("alice", "studio-1");
        assert!(!token.contains("test-api-secret-0123456789"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = AccessToken::with_api_key("", &secret())
            .with_identity("alice")
            .to_jwt();

        assert_eq!(result, Err(AccessTokenError::InvalidKeys));
    }

    #[test]
    fn test_empty_api_secret_rejected() {
        let result = AccessToken::with_api_key("APItestkey", &SecretString::from(""))
            .with_identity("alice")
            .to_jwt();

        assert_eq!(result, Err(AccessTokenError::InvalidKeys));
    }

    #[test]
    fn test_empty_identity_is_signed() {
        let token = issue("", "");
        let claims = verify_access_token(&token, &secret()).unwrap();

        assert_eq!(claims.sub, "");
        assert_eq!(claims.video.room, "");
        assert!(claims.video.room_join);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issue("alice", "dev");
        let result = verify_access_token(&token, &SecretString::from("other-secret"));

        assert!(matches!(result, Err(AccessTokenError::Verification(_))));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            iss: "APItestkey".to_string(),
            sub: "alice".to_string(),
            jti: "alice".to_string(),
            nbf: now - 7200,
            exp: now - 3600,
            video: VideoGrant::room_join("dev"),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-api-secret-0123456789"),
        )
        .unwrap();

        let result = verify_access_token(&token, &secret());
        assert!(matches!(result, Err(AccessTokenError::Verification(_))));
    }

    #[test]
    fn test_verify_rejects_oversized_token() {
        let token = "a".repeat(MAX_TOKEN_SIZE_BYTES + 1);
        let result = verify_access_token(&token, &secret());

        assert!(matches!(result, Err(AccessTokenError::Verification(msg)) if msg.contains("maximum size")));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let result = verify_access_token("not.a.jwt", &secret());
        assert!(matches!(result, Err(AccessTokenError::Verification(_))));
    }

    #[test]
    fn test_claims_debug_redacts_identity() {
        let token = issue("alice-private", "dev");
        let claims = verify_access_token(&token, &secret()).unwrap();
        let debug = format!("{claims:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("alice-private"));
        assert!(debug.contains("APItestkey"));
    }

    #[test]
    fn test_builder_debug_redacts_secret() {
        let builder = AccessToken::with_api_key("APItestkey", &secret()).with_identity("carol");
        let debug = format!("{builder:?}");

        assert!(!debug.contains("test-api-secret-0123456789"));
        assert!(!debug.contains("carol"));
    }

    #[test]
    fn test_video_grant_deserializes_with_defaults() {
        let grant: VideoGrant = serde_json::from_str(r#"{"room":"dev"}"#).unwrap();
        assert_eq!(grant.room, "dev");
        assert!(!grant.room_join);
    }
}
