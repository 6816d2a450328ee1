//! # CS Test Utilities
//!
//! Shared test utilities for the Connection Service (CS).
//!
//! This crate provides:
//! - Server test harness (`TestConnectionServer` for E2E tests)
//! - Fixed test credentials (`TEST_SERVER_URL`, `TEST_API_KEY`, `TEST_API_SECRET`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cs_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestConnectionServer::spawn().await?;
//!
//!     let response = reqwest::get(format!("{}/health", server.url())).await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
