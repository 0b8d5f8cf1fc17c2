mod analysis;
mod auth;
mod config;
mod db;
mod errors;
mod export;
mod extract;
mod llm;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::export::speech::SpeechClient;
use crate::llm::{BackoffPolicy, FallbackGenerator, GeminiClient};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("careerai={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerAI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite (credential table)
    let db = create_pool(&config.database_url).await?;

    // Client for job-posting fetches: short timeout, no retries
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()?;

    // Generation backend and fallback chain
    let llm = GeminiClient::new(config.google_api_key.clone());
    let generator = FallbackGenerator::new(
        config.model_chain.clone(),
        BackoffPolicy {
            rate_limit_delay: Duration::from_secs(config.rate_limit_backoff_secs),
            same_model_retries: config.rate_limit_retries,
        },
    );
    info!("LLM fallback chain: {}", config.model_chain.join(" -> "));

    let speech = SpeechClient::new(config.google_api_key.clone());
    let sessions = SessionStore::new();

    let state = AppState {
        db,
        http,
        llm,
        generator,
        speech,
        sessions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
