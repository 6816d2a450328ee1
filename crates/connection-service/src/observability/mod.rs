//! Observability module for Connection Service.
//!
//! Provides metrics definitions and the Prometheus recorder setup.

pub mod metrics;
