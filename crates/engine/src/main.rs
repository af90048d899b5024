//! Event Recorder Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event_recorder_engine::{
    api,
    config::RecorderConfig,
    infrastructure::postgres::{self, PostgresRetrievalEventRepo},
    App,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_recorder_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Event Recorder Engine");

    // Load configuration
    let config = RecorderConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    // Connect to Postgres and ensure the events table exists
    let pool = postgres::connect(&config.database).await?;
    postgres::ensure_schema(&pool).await?;

    let repo = Arc::new(PostgresRetrievalEventRepo::new(pool));

    if config.api_key.is_none() {
        tracing::warn!("API_KEY is not set; retrieval event ingestion is unauthenticated");
    }

    // Create application
    let app = Arc::new(App::new(
        repo,
        config.retention.interval.clone(),
        config.api_key.clone(),
    ));

    // Spawn retention job
    if config.retention.enabled {
        api::retention::spawn_daily(app.use_cases.retrieval_events.delete_old.clone());
    } else {
        tracing::info!("Retention job disabled");
    }

    let router = api::http::router(app).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
