//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports [`secrecy`] types. The API secret used to sign room access
//! tokens is held as a [`SecretString`] from the moment it is read out of the
//! environment until it is handed to the JWT encoder.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that
//! derives `Debug` and holds one is safe to pass to `tracing` or `{:?}`.
//! Reading the value requires an explicit `expose_secret()` call, which keeps
//! every use of the signing secret greppable.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct SigningKeys {
//!     api_key: String,
//!     api_secret: SecretString,
//! }
//!
//! let keys = SigningKeys {
//!     api_key: "APIdevkey".to_string(),
//!     api_secret: SecretString::from("devsecret"),
//! };
//!
//! // The secret is redacted
//! assert!(!format!("{keys:?}").contains("devsecret"));
//!
//! // Explicit access for signing
//! let secret: &str = keys.api_secret.expose_secret();
//! assert_eq!(secret, "devsecret");
//! ```

pub use secrecy::{ExposeSecret, SecretString};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("livekit-api-secret");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("livekit-api-secret"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("signing-secret");
        assert_eq!(secret.expose_secret(), "signing-secret");
    }

    #[test]
    fn test_struct_with_secret_is_safe() {
        #[allow(dead_code)]
        #[derive(Debug)]
        struct KeyPair {
            api_key: String,
            api_secret: SecretString,
        }

        let keys = KeyPair {
            api_key: "APIkey123".to_string(),
            api_secret: SecretString::from("super-secret"),
        };

        let debug_str = format!("{keys:?}");

        assert!(debug_str.contains("APIkey123"));
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super-secret"));
    }

    #[test]
    fn test_deserialize() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct Keys {
            api_key: String,
            api_secret: SecretString,
        }

        let json = r#"{"api_key": "APIkey", "api_secret": "from-json"}"#;
        let keys: Keys = serde_json::from_str(json).expect("deserialize");

        assert_eq!(keys.api_secret.expose_secret(), "from-json");

        let debug = format!("{keys:?}");
        assert!(!debug.contains("from-json"));
    }

    #[test]
    fn test_clone_works() {
        let secret = SecretString::from("cloneable");
        let cloned = secret.clone();
        assert_eq!(cloned.expose_secret(), "cloneable");
    }
}
