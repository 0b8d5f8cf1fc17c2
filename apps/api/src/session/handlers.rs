//! Axum route handlers for session lifecycle.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub username: Option<String>,
    pub has_resume: bool,
    pub has_job: bool,
    pub has_report: bool,
}

impl From<&SessionContext> for SessionSummary {
    fn from(s: &SessionContext) -> Self {
        Self {
            id: s.id,
            username: s.username.clone(),
            has_resume: s.resume.is_some(),
            has_job: s.job.is_some(),
            has_report: s.last_report.is_some(),
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Json<SessionSummary> {
    let session = state.sessions.create(request.username).await;
    Json(SessionSummary::from(&session))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = require_session(&state, id).await?;
    Ok(Json(SessionSummary::from(&session)))
}

/// POST /api/v1/sessions/:id/reset
///
/// Clears documents and results; identity fields survive.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    state
        .sessions
        .with_session(id, |s| s.reset())
        .await
        .ok_or_else(|| session_not_found(id))?;
    let session = require_session(&state, id).await?;
    Ok(Json(SessionSummary::from(&session)))
}

pub(crate) async fn require_session(
    state: &AppState,
    id: Uuid,
) -> Result<SessionContext, AppError> {
    state
        .sessions
        .snapshot(id)
        .await
        .ok_or_else(|| session_not_found(id))
}

pub(crate) fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
