use reqwest::Client as HttpClient;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::export::speech::SpeechClient;
use crate::llm::{FallbackGenerator, GeminiClient};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Client for job-posting fetches (short timeout, single attempt).
    pub http: HttpClient,
    /// Generation backend; all model calls go through this client.
    pub llm: GeminiClient,
    /// Model fallback chain walked on every generation.
    pub generator: FallbackGenerator,
    pub speech: SpeechClient,
    pub sessions: SessionStore,
    pub config: Config,
}
