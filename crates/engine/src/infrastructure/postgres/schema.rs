//! Postgres schema initialization.

use sqlx::PgPool;

use crate::infrastructure::ports::RepoError;

const CREATE_RETRIEVAL_EVENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS retrieval_events (
        retrieval_id text NOT NULL,
        instance_id text NOT NULL,
        cid text NOT NULL,
        storage_provider_id text,
        phase character varying(15) NOT NULL,
        phase_start_time timestamp with time zone NOT NULL,
        event_name character varying(32) NOT NULL,
        event_time timestamp with time zone NOT NULL,
        event_details jsonb
    )
"#;

/// Create the `retrieval_events` table if it does not exist.
///
/// Called once on startup. No primary key or uniqueness constraint: duplicate
/// events are stored as submitted. Opaque identifiers are unbounded `text`,
/// so any event that passes validation fits its row.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepoError> {
    sqlx::query(CREATE_RETRIEVAL_EVENTS)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Could not execute create table query");
            RepoError::from_sqlx("ensure_schema", e)
        })?;

    tracing::info!("Postgres schema initialized (retrieval_events ensured)");
    Ok(())
}
