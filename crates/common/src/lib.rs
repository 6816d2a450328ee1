//! Common utilities and types shared by the connection service crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for room access tokens (grants, claims, signing, verification)
pub mod access_token;
