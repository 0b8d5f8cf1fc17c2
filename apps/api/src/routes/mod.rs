pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::export::handlers as export;
use crate::extract::handlers as extract;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Credential gate
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_create))
        .route("/api/v1/sessions/:id", get(session::handle_get))
        .route("/api/v1/sessions/:id/reset", post(session::handle_reset))
        // Document ingestion
        .route(
            "/api/v1/sessions/:id/resume",
            post(extract::handle_attach_resume),
        )
        .route("/api/v1/sessions/:id/job", post(extract::handle_attach_job))
        // Analysis pipeline
        .route(
            "/api/v1/sessions/:id/analyze",
            post(analysis::handle_analyze),
        )
        .route(
            "/api/v1/sessions/:id/interview",
            post(analysis::handle_interview_guide),
        )
        .route(
            "/api/v1/sessions/:id/interview/question",
            post(analysis::handle_single_question),
        )
        // Export
        .route("/api/v1/sessions/:id/report", post(export::handle_report))
        .route("/api/v1/sessions/:id/speech", post(export::handle_speech))
        .with_state(state)
}
