//! Event Recorder Engine library.
//!
//! Ingests retrieval event telemetry over HTTP, persists validated batches to
//! Postgres and prunes events past the retention window.
//!
//! ## Structure
//!
//! - `use_cases/` - Save and retention orchestration over the store port
//! - `infrastructure/` - Store port, Postgres adapter, correlation IDs
//! - `api/` - HTTP entry points, API key middleware, retention schedule
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

/// E2E integration tests using real Postgres via testcontainers.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
