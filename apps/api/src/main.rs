mod completion;
mod config;
mod db;
mod errors;
mod jobs;
mod keywords;
mod models;
mod preferences;
mod resumes;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::completion::OpenAiClient;
use crate::config::Config;
use crate::db::{apply_schema, create_pool};
use crate::resumes::provider::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting KeyGuru API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    apply_schema(&db).await?;

    // Initialize completion client
    let llm = OpenAiClient::new(config.completion_settings())?;
    info!(
        "Completion client initialized (model: {}, timeout: {}s, attempts: {})",
        completion::MODEL,
        config.completion_timeout_secs,
        config.completion_max_attempts
    );

    let lead_ins = config.lead_ins();
    info!("Loaded {} keyword lead-in patterns", lead_ins.patterns().len());

    // Build app state
    let state = AppState {
        resumes: Arc::new(PgResumeStore::new(db.clone())),
        db,
        llm: Arc::new(llm),
        lead_ins: Arc::new(lead_ins),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
