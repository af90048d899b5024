//! Port traits for infrastructure boundaries.
//!
//! The retrieval event store is the only abstraction in the engine, so the
//! use cases can be exercised against mocks instead of Postgres.

mod error;
mod repos;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::RetrievalEventRepo;

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::MockRetrievalEventRepo;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
