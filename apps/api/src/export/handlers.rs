//! Axum route handlers for report and audio export.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::report::render_report;
use crate::export::speech::sanitize_for_speech;
use crate::session::handlers::require_session;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/report
///
/// Renders the session's last analysis reply as a downloadable PDF.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let session = require_session(&state, id).await?;
    let report = session.last_report.as_ref().ok_or_else(|| {
        AppError::Validation("No analysis has been run in this session".to_string())
    })?;

    let bytes = render_report("Reporte de compatibilidad", &report.full_text)
        .map_err(|e| AppError::Export(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"reporte.pdf\""),
    );
    Ok((headers, bytes))
}

/// POST /api/v1/sessions/:id/speech
///
/// Synthesizes the session's last interview question as audio.
pub async fn handle_speech(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let session = require_session(&state, id).await?;
    let question = session.last_question.as_ref().ok_or_else(|| {
        AppError::Validation("No interview question has been generated".to_string())
    })?;

    let audio = state
        .speech
        .synthesize(&sanitize_for_speech(question))
        .await
        .map_err(|e| AppError::Export(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&audio.mime_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    Ok((headers, audio.bytes))
}
