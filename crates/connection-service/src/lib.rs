//! Connection Service Library
//!
//! Issues media-room connection details to front-end clients: the media
//! server URL, the API key, and a short-lived participant token that grants
//! a single identity permission to join a single room.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/token_signer.rs -> common::access_token
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Request and response types
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `services` - Token signer trait and implementations

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
