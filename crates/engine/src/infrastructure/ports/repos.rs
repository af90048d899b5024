//! Repository port traits for database access.

use async_trait::async_trait;
use event_recorder_domain::{RetentionInterval, RetrievalEvent, RetrievalEventBatch};

use super::error::RepoError;

// =============================================================================
// Retrieval Event Storage
// =============================================================================

/// Write-side storage of retrieval events.
///
/// Implementations surface every store failure as a `RepoError`; nothing is
/// retried or swallowed here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RetrievalEventRepo: Send + Sync {
    /// Persist one event.
    async fn save(&self, event: &RetrievalEvent) -> Result<(), RepoError>;

    /// Persist every event of the batch as one all-or-nothing write.
    ///
    /// An empty batch returns immediately without touching the store.
    async fn save_batch(&self, batch: &RetrievalEventBatch) -> Result<(), RepoError>;

    /// Delete events whose `event_time` is at or before the start of the
    /// current day minus `interval`. Returns the number of deleted rows.
    async fn delete_old_events(&self, interval: &RetentionInterval) -> Result<u64, RepoError>;
}
