//! Backend E2E integration tests.
//!
//! These tests run the Postgres adapter and the HTTP boundary against a real
//! Postgres started with testcontainers.
//!
//! # Running E2E Tests
//!
//! ```bash
//! # Run all E2E tests (requires Docker)
//! cargo test -p event-recorder-engine --lib e2e_tests -- --ignored --test-threads=1
//! ```

mod postgres_test_harness;

pub use postgres_test_harness::*;
