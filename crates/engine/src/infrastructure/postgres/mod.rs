//! PostgreSQL adapter for retrieval event storage.

mod retrieval_event_repo;
mod schema;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::infrastructure::ports::RepoError;

pub use retrieval_event_repo::PostgresRetrievalEventRepo;
pub use schema::ensure_schema;

/// Open a connection pool and verify the database is reachable.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, RepoError> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        max_connections = config.max_connections,
        "Connecting to Postgres"
    );

    pool_options(config)
        .connect_with(connect_options(config))
        .await
        .map_err(|e| RepoError::from_sqlx("connect", e))
}

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .database(&config.name)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
}
