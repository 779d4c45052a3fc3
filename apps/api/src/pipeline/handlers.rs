//! Axum route handlers for the evaluation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::candidate::{extract_email, extract_name};
use crate::intake::pdf::extract_text_from_pdf;
use crate::pipeline::decision::decide;
use crate::pipeline::models::{
    CandidateSummary, Decision, JobRequirements, MatchResult, Notification,
};
use crate::state::AppState;

const PREVIEW_CHARS: usize = 1000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProcessResumeResponse {
    pub evaluation_id: Uuid,
    pub file_name: Option<String>,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub job_data: JobRequirements,
    pub resume_summary: CandidateSummary,
    pub match_result: MatchResult,
    pub decision_result: Decision,
    pub email_content: Notification,
    pub text_preview: String,
    pub length: usize,
}

/// `match_result` may be an object or a JSON-encoded string of one.
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    #[serde(default)]
    pub match_result: Value,
}

/// `decision_result` may be an object or a JSON-encoded string of one.
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub decision_result: Value,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_email: String,
}

/// Multipart fields of an upload, before validation.
#[derive(Default)]
struct ResumeUpload {
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    meta: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /process_resume
///
/// Multipart upload: `resume` (PDF file) and optional `meta` (job requirements JSON).
/// Runs the full evaluation and returns every stage's output.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessResumeResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let bytes = upload
        .bytes
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    let text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the resume.".to_string(),
        ));
    }

    let job_data = parse_job_meta(upload.meta.as_deref())?;
    let candidate_email = extract_email(&text);
    let candidate_name = extract_name(&text);
    info!(
        "Processing resume {:?} ({} chars)",
        upload.file_name,
        text.chars().count()
    );

    let ctx = state
        .pipeline
        .run(
            text,
            job_data,
            candidate_name.clone().unwrap_or_default(),
            candidate_email.clone().unwrap_or_default(),
        )
        .await
        .map_err(|e| AppError::Llm(format!("Resume evaluation failed: {e}")))?;

    Ok(Json(ProcessResumeResponse {
        evaluation_id: ctx.evaluation_id,
        file_name: upload.file_name,
        candidate_name,
        candidate_email,
        text_preview: preview(&ctx.resume_text),
        length: ctx.resume_text.chars().count(),
        job_data: ctx.job_requirements,
        resume_summary: ctx.resume_summary,
        match_result: ctx.match_result,
        decision_result: ctx.decision_result,
        email_content: ctx.email_content,
    }))
}

/// POST /decide
///
/// Applies the decision policy to a match result produced elsewhere.
pub async fn handle_decide(Json(request): Json<DecideRequest>) -> Json<Decision> {
    Json(decide(&MatchResult::from_wire(&request.match_result)))
}

/// POST /notify
///
/// Renders the notification for a decision produced elsewhere. Never dispatches:
/// mail only leaves through a full `/process_resume` evaluation.
pub async fn handle_notify(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Json<Notification> {
    let decision = Decision::from_wire(&request.decision_result);
    Json(state.pipeline.notifier().render(
        &decision,
        &request.candidate_name,
        &request.candidate_email,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut upload = ResumeUpload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                upload.file_name = field.file_name().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume: {e}")))?;
                upload.bytes = Some(bytes.to_vec());
            }
            Some("meta") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read meta: {e}")))?;
                upload.meta = Some(text);
            }
            _ => {}
        }
    }
    Ok(upload)
}

/// Missing or blank metadata means an empty job record.
fn parse_job_meta(meta: Option<&str>) -> Result<JobRequirements, AppError> {
    match meta.map(str::trim) {
        None | Some("") => Ok(JobRequirements::default()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("failed to parse job metadata: {e}"))),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
