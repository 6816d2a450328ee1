//! Room access token signer.
//!
//! The handler depends on the [`TokenSigner`] trait rather than on the JWT
//! encoder directly, so tests can substitute [`mock::MockTokenSigner`] and
//! observe exactly which identity and grant were signed.

use crate::config::Config;
use crate::errors::CsError;
use common::access_token::{AccessToken, VideoGrant};
use common::secret::SecretString;
use std::fmt;
use std::time::Duration;
use tracing::instrument;

/// Trait for token signing (enables mocking).
#[async_trait::async_trait]
pub trait TokenSigner: Send + Sync {
    /// Sign a token granting `identity` the capabilities in `grant`.
    async fn sign(&self, identity: &str, grant: &VideoGrant) -> Result<String, CsError>;
}

/// Signs HS256 access tokens with the configured API key pair.
pub struct JwtTokenSigner {
    api_key: String,
    api_secret: SecretString,
    ttl: Duration,
}

impl fmt::Debug for JwtTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenSigner")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtTokenSigner {
    /// Create a signer for the given key pair and token lifetime.
    pub fn new(api_key: String, api_secret: SecretString, ttl: Duration) -> Self {
        Self {
            api_key,
            api_secret,
            ttl,
        }
    }

    /// Create a signer from service configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.token_ttl(),
        )
    }
}

#[async_trait::async_trait]
impl TokenSigner for JwtTokenSigner {
    #[instrument(skip_all, name = "cs.services.token_signer.sign")]
    async fn sign(&self, identity: &str, grant: &VideoGrant) -> Result<String, CsError> {
        let token = AccessToken::with_api_key(&self.api_key, &self.api_secret)
            .with_identity(identity)
            .with_grant(grant.clone())
            .with_ttl(self.ttl)
            .to_jwt()?;

        Ok(token)
    }
}

/// Mock token signer module for testing.
///
/// Used by unit tests here and by the `cs-test-utils` server harness.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// A recorded `sign` invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SignCall {
        pub identity: String,
        pub grant: VideoGrant,
    }

    /// Mock signer returning deterministic tokens.
    ///
    /// Tokens have the form `mock-token:{identity}:{room}`.
    pub struct MockTokenSigner {
        calls: Mutex<Vec<SignCall>>,
        return_error: bool,
        delay: Duration,
    }

    impl MockTokenSigner {
        /// Create a mock that always signs.
        pub fn succeeding() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                return_error: false,
                delay: Duration::ZERO,
            }
        }

        /// Create a mock that always fails.
        pub fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                return_error: true,
                delay: Duration::ZERO,
            }
        }

        /// Sleep for `delay` inside every `sign` call.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        /// Calls recorded so far, in order.
        pub fn calls(&self) -> Vec<SignCall> {
            self.calls
                .lock()
                .map(|calls| calls.clone())
                .unwrap_or_default()
        }

        /// Number of calls made.
        pub fn call_count(&self) -> usize {
            self.calls().len()
        }

        /// Token this mock returns for the given inputs.
        pub fn token_for(identity: &str, room: &str) -> String {
            format!("mock-token:{}:{}", identity, room)
        }
    }

    #[async_trait::async_trait]
    impl TokenSigner for MockTokenSigner {
        async fn sign(&self, identity: &str, grant: &VideoGrant) -> Result<String, CsError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(SignCall {
                    identity: identity.to_string(),
                    grant: grant.clone(),
                });
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if self.return_error {
                return Err(CsError::Signing("Mock signer error".to_string()));
            }

            Ok(Self::token_for(identity, &grant.room))
        }
    }

}
