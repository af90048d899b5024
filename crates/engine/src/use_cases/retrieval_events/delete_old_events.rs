//! Prune retrieval events older than the retention window.

use std::sync::Arc;

use event_recorder_domain::RetentionInterval;

use crate::infrastructure::ports::{RepoError, RetrievalEventRepo};

pub struct DeleteOldEvents {
    repo: Arc<dyn RetrievalEventRepo>,
    interval: RetentionInterval,
}

impl DeleteOldEvents {
    pub fn new(repo: Arc<dyn RetrievalEventRepo>, interval: RetentionInterval) -> Self {
        Self { repo, interval }
    }

    pub fn interval(&self) -> &RetentionInterval {
        &self.interval
    }

    /// Delete events older than the configured interval, counted back from
    /// the start of the current day. Returns the number of deleted events.
    pub async fn execute(&self) -> Result<u64, RepoError> {
        let deleted = self
            .repo
            .delete_old_events(&self.interval)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, interval = %self.interval, "Could not delete old events");
                e
            })?;

        tracing::info!(interval = %self.interval, deleted, "Deleted old retrieval events");
        Ok(deleted)
    }
}
