//! # Auth Test Utilities
//!
//! Shared test utilities for the authentication service.
//!
//! This crate provides:
//! - An in-memory account store (`MemoryAccountStore`)
//! - Deterministic key fixtures and account seeding helpers
//! - A server test harness (`TestAuthServer` for E2E tests)
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let store = MemoryAccountStore::new();
//!     seed_account(&store, "a@x.com", "Ann", "secret").await;
//!
//!     let server = TestAuthServer::spawn(store).await?;
//!
//!     // ... drive the wire contract with an HTTP client ...
//!
//!     token
//!         .assert_valid_session_token()
//!         .assert_for_email("a@x.com");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use server_harness::*;
