//! HTTP request handlers for Connection Service.

pub mod connection_details;
pub mod health;
pub mod metrics;

pub use connection_details::get_connection_details;
pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
