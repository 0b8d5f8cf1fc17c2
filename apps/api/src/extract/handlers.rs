//! Axum route handlers for attaching documents to a session.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{self, web, ExtractedDocument, SourceKind};
use crate::session::handlers::{session_not_found, SessionSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AttachJobRequest {
    pub url: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttachResponse {
    pub session: SessionSummary,
    pub source: SourceKind,
    pub chars: usize,
}

/// POST /api/v1/sessions/:id/resume  (multipart, field `file`)
///
/// Accepts a PDF or Word résumé upload and stores its extracted text in the
/// session.
pub async fn handle_attach_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<AttachResponse>, AppError> {
    let mut document: Option<ExtractedDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .ok_or_else(|| AppError::Validation("File field has no filename".to_string()))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        document = Some(extract::extract_upload(&filename, &bytes)?);
        break;
    }

    let document =
        document.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    attach(&state, id, document, |s, doc| s.resume = Some(doc)).await
}

/// POST /api/v1/sessions/:id/job  (json: {url} or {text})
///
/// Attaches the job posting, either fetched from a URL (single attempt) or
/// pasted as plain text.
pub async fn handle_attach_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachJobRequest>,
) -> Result<Json<AttachResponse>, AppError> {
    let document = match (request.url, request.text) {
        (Some(url), None) => {
            let text = web::fetch_visible_text(&state.http, &url).await?;
            ExtractedDocument::new(SourceKind::Url, text)
        }
        (None, Some(text)) => {
            if text.trim().is_empty() {
                return Err(AppError::Validation("Pasted text is empty".to_string()));
            }
            ExtractedDocument::new(SourceKind::Pasted, text)
        }
        _ => {
            return Err(AppError::Validation(
                "Provide exactly one of 'url' or 'text'".to_string(),
            ))
        }
    };
    attach(&state, id, document, |s, doc| s.job = Some(doc)).await
}

async fn attach(
    state: &AppState,
    id: Uuid,
    document: ExtractedDocument,
    assign: impl FnOnce(&mut crate::session::SessionContext, ExtractedDocument),
) -> Result<Json<AttachResponse>, AppError> {
    let source = document.source;
    let chars = document.text.chars().count();

    let summary = state
        .sessions
        .with_session(id, |s| {
            assign(s, document);
            SessionSummary::from(&*s)
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(AttachResponse {
        session: summary,
        source,
        chars,
    }))
}
