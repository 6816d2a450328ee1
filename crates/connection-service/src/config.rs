//! Connection Service configuration.
//!
//! Configuration is loaded once from environment variables at startup and is
//! read-only afterwards. The API secret is held in a `SecretString` and is
//! redacted in Debug output.

use common::access_token::DEFAULT_TOKEN_TTL;
use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Maximum token lifetime in seconds (24 hours).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 86_400;

/// Connection Service configuration.
#[derive(Clone)]
pub struct Config {
    /// WebSocket URL of the media server, returned to clients as `serverUrl`.
    pub server_url: String,

    /// API key. Returned to clients as `apiKey` and used as the token issuer.
    pub api_key: String,

    /// API secret used to sign tokens. Never returned or logged.
    pub api_secret: SecretString,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Lifetime of issued tokens in seconds (default: 21600).
    pub token_ttl_seconds: u64,

    /// Seconds to wait after a shutdown signal before stopping (default: 0).
    pub drain_seconds: u64,
}

/// Custom Debug implementation that redacts the API secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("drain_seconds", &self.drain_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token TTL configuration: {0}")]
    InvalidTokenTtl(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let server_url = required(vars, "LIVEKIT_URL")?;
        let api_key = required(vars, "LIVEKIT_API_KEY")?;
        let api_secret = SecretString::from(required(vars, "LIVEKIT_API_SECRET")?);

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let token_ttl_seconds = if let Some(value_str) = vars.get("TOKEN_TTL_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTokenTtl(format!(
                    "TOKEN_TTL_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidTokenTtl(
                    "TOKEN_TTL_SECONDS must be greater than 0".to_string(),
                ));
            }

            if value > MAX_TOKEN_TTL_SECONDS {
                return Err(ConfigError::InvalidTokenTtl(format!(
                    "TOKEN_TTL_SECONDS must not exceed {} seconds, got {}",
                    MAX_TOKEN_TTL_SECONDS, value
                )));
            }

            value
        } else {
            DEFAULT_TOKEN_TTL.as_secs()
        };

        let drain_seconds = match vars.get("CS_DRAIN_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "CS_DRAIN_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => 0,
        };

        Ok(Config {
            server_url,
            api_key,
            api_secret,
            bind_address,
            token_ttl_seconds,
            drain_seconds,
        })
    }

    /// Shutdown drain period as a `Duration`.
    pub fn drain_period(&self) -> Duration {
        Duration::from_secs(self.drain_seconds)
    }

    /// Token lifetime as a `Duration`.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }
}

fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            (
                "LIVEKIT_URL".to_string(),
                "wss://media.example.com".to_string(),
            ),
            ("LIVEKIT_API_KEY".to_string(), "APIexamplekey".to_string()),
            (
                "LIVEKIT_API_SECRET".to_string(),
                "example-secret-value".to_string(),
            ),
        ])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.server_url, "wss://media.example.com");
        assert_eq!(config.api_key, "APIexamplekey");
        assert_eq!(config.api_secret.expose_secret(), "example-secret-value");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.token_ttl_seconds, 21_600);
        assert_eq!(config.token_ttl(), DEFAULT_TOKEN_TTL);
        assert_eq!(config.drain_seconds, 0);
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:3000".to_string());
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "900".to_string());
        vars.insert("CS_DRAIN_SECONDS".to_string(), "15".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.token_ttl_seconds, 900);
        assert_eq!(config.token_ttl(), Duration::from_secs(900));
        assert_eq!(config.drain_period(), Duration::from_secs(15));
    }

    #[test]
    fn test_from_vars_missing_server_url() {
        let mut vars = base_vars();
        vars.remove("LIVEKIT_URL");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "LIVEKIT_URL"));
    }

    #[test]
    fn test_from_vars_missing_api_key() {
        let mut vars = base_vars();
        vars.remove("LIVEKIT_API_KEY");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "LIVEKIT_API_KEY"));
    }

    #[test]
    fn test_from_vars_missing_api_secret() {
        let mut vars = base_vars();
        vars.remove("LIVEKIT_API_SECRET");

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "LIVEKIT_API_SECRET")
        );
    }

    #[test]
    fn test_token_ttl_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidTokenTtl(msg)) if msg.contains("must be greater than 0"))
        );
    }

    #[test]
    fn test_token_ttl_rejects_too_large() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "86401".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidTokenTtl(msg)) if msg.contains("must not exceed 86400"))
        );
    }

    #[test]
    fn test_token_ttl_accepts_max() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "86400".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");
        assert_eq!(config.token_ttl_seconds, MAX_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_token_ttl_rejects_non_numeric() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "six-hours".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidTokenTtl(msg)) if msg.contains("must be a valid positive integer"))
        );
    }

    #[test]
    fn test_drain_seconds_rejects_non_numeric() {
        let mut vars = base_vars();
        vars.insert("CS_DRAIN_SECONDS".to_string(), "thirty".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidDrainSeconds(msg)) if msg.contains("CS_DRAIN_SECONDS"))
        );
    }

    #[test]
    fn test_drain_seconds_rejects_negative() {
        let mut vars = base_vars();
        vars.insert("CS_DRAIN_SECONDS".to_string(), "-5".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidDrainSeconds(_))));
    }

    #[test]
    fn test_debug_redacts_api_secret() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("example-secret-value"));
        assert!(debug_output.contains("APIexamplekey"));
    }
}
