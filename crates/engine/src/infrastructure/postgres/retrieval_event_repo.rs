//! Retrieval event repository backed by Postgres.

use async_trait::async_trait;
use event_recorder_domain::{RetentionInterval, RetrievalEvent, RetrievalEventBatch};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

use crate::infrastructure::ports::{RepoError, RetrievalEventRepo};

const INSERT_PREFIX: &str = "INSERT INTO retrieval_events (retrieval_id, instance_id, cid, \
     storage_provider_id, phase, phase_start_time, event_name, event_time, event_details) ";

const DELETE_OLD_EVENTS: &str = "DELETE FROM retrieval_events \
     WHERE event_time <= (CURRENT_TIMESTAMP::date - $1::interval)";

const COLUMNS_PER_ROW: usize = 9;

/// Postgres accepts at most 65535 bind parameters per statement.
const MAX_ROWS_PER_STATEMENT: usize = u16::MAX as usize / COLUMNS_PER_ROW;

pub struct PostgresRetrievalEventRepo {
    pool: PgPool,
}

impl PostgresRetrievalEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build one multi-row insert for `events`.
fn insert_statement(events: &[RetrievalEvent]) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(INSERT_PREFIX);
    builder.push_values(events, |mut row, event| {
        row.push_bind(event.retrieval_id())
            .push_bind(event.instance_id())
            .push_bind(event.cid())
            .push_bind(event.storage_provider_id())
            .push_bind(event.phase().as_str())
            .push_bind(event.phase_start_time().as_datetime())
            .push_bind(event.event_name().as_str())
            .push_bind(event.event_time().as_datetime())
            .push_bind(event.event_details().cloned().map(Json));
    });
    builder
}

#[async_trait]
impl RetrievalEventRepo for PostgresRetrievalEventRepo {
    async fn save(&self, event: &RetrievalEvent) -> Result<(), RepoError> {
        let mut insert = insert_statement(std::slice::from_ref(event));
        insert.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!(
                error = %e,
                retrieval_id = %event.retrieval_id(),
                "Could not execute insert query for retrieval event"
            );
            RepoError::from_sqlx("save", e)
        })?;

        tracing::debug!(retrieval_id = %event.retrieval_id(), "Saved retrieval event");
        Ok(())
    }

    async fn save_batch(&self, batch: &RetrievalEventBatch) -> Result<(), RepoError> {
        let events = batch.events();
        if events.is_empty() {
            tracing::debug!("Retrieval event batch is empty");
            return Ok(());
        }

        let count = events.len();
        let log_failure = |e: sqlx::Error| {
            tracing::error!(
                error = %e,
                events = count,
                "Could not execute insert query for retrieval event batch"
            );
            RepoError::from_sqlx("save_batch", e)
        };

        if count <= MAX_ROWS_PER_STATEMENT {
            let mut insert = insert_statement(events);
            insert
                .build()
                .execute(&self.pool)
                .await
                .map_err(log_failure)?;
        } else {
            // Oversized batches span several statements; the transaction keeps
            // them all-or-nothing.
            let mut tx = self.pool.begin().await.map_err(log_failure)?;
            for chunk in events.chunks(MAX_ROWS_PER_STATEMENT) {
                let mut insert = insert_statement(chunk);
                insert
                    .build()
                    .execute(&mut *tx)
                    .await
                    .map_err(log_failure)?;
            }
            tx.commit().await.map_err(log_failure)?;
        }

        tracing::debug!(events = count, "Saved retrieval events");
        Ok(())
    }

    async fn delete_old_events(&self, interval: &RetentionInterval) -> Result<u64, RepoError> {
        let result = sqlx::query(DELETE_OLD_EVENTS)
            .bind(interval.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    interval = %interval,
                    "Could not execute delete old events query"
                );
                RepoError::from_sqlx("delete_old_events", e)
            })?;

        let deleted = result.rows_affected();
        tracing::debug!(interval = %interval, deleted, "Deleted old retrieval events");
        Ok(deleted)
    }
}
