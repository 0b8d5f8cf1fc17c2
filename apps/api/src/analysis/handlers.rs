//! Axum route handlers for the analysis and interview endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{run_analysis, AnalysisReport, AnalysisSections};
use crate::errors::AppError;
use crate::export::speech::sanitize_for_speech;
use crate::llm::templates::Template;
use crate::session::handlers::{require_session, session_not_found};
use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub template: Option<Template>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub summary: AnalysisSections,
    pub report: AnalysisReport,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub report: AnalysisReport,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: String,
    pub speech_text: String,
    pub model_used: String,
}

/// POST /api/v1/sessions/:id/analyze
///
/// Compatibility pipeline: prompt → fallback generation → score + sections.
/// Requires both the résumé and the job posting to be attached.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let template = request.template.unwrap_or(Template::FullScanReport);
    if !template.needs_resume() {
        return Err(AppError::Validation(format!(
            "Template '{}' belongs to the interview endpoints",
            template.id()
        )));
    }

    let session = require_session(&state, id).await?;
    let resume = session
        .resume
        .as_ref()
        .ok_or_else(|| AppError::Validation("No résumé attached to this session".to_string()))?;
    let job = require_job(&session)?;

    let report = run_analysis(
        &state.llm,
        &state.generator,
        template,
        Some(&resume.text),
        &job.text,
        state.config.prompt_char_budget,
    )
    .await?;

    let summary = AnalysisSections::from_reply(&report.full_text);
    store_report(&state, id, report.clone()).await?;

    Ok(Json(AnalyzeResponse { summary, report }))
}

/// POST /api/v1/sessions/:id/interview
///
/// Interview preparation guide built from the job posting alone.
pub async fn handle_interview_guide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewResponse>, AppError> {
    let session = require_session(&state, id).await?;
    let job = require_job(&session)?;

    let report = run_analysis(
        &state.llm,
        &state.generator,
        Template::InterviewQuestions,
        None,
        &job.text,
        state.config.prompt_char_budget,
    )
    .await?;

    store_report(&state, id, report.clone()).await?;
    Ok(Json(InterviewResponse { report }))
}

/// POST /api/v1/sessions/:id/interview/question
///
/// One interview question, kept on the session for later synthesis.
pub async fn handle_single_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionResponse>, AppError> {
    let session = require_session(&state, id).await?;
    let job = require_job(&session)?;

    let report = run_analysis(
        &state.llm,
        &state.generator,
        Template::SingleInterviewQuestion,
        None,
        &job.text,
        state.config.prompt_char_budget,
    )
    .await?;

    let question = report.full_text.trim().to_string();
    let speech_text = sanitize_for_speech(&question);
    let model_used = report.model_used.clone();

    state
        .sessions
        .with_session(id, |s| s.last_question = Some(question.clone()))
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(QuestionResponse {
        question,
        speech_text,
        model_used,
    }))
}

fn require_job(session: &SessionContext) -> Result<&crate::extract::ExtractedDocument, AppError> {
    session
        .job
        .as_ref()
        .ok_or_else(|| AppError::Validation("No job posting attached to this session".to_string()))
}

async fn store_report(state: &AppState, id: Uuid, report: AnalysisReport) -> Result<(), AppError> {
    state
        .sessions
        .with_session(id, |s| s.last_report = Some(report))
        .await
        .ok_or_else(|| session_not_found(id))
}
