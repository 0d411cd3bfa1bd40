//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::assembler::analyze;
use crate::analysis::intake::{check_length, read_uploaded_text};
use crate::analysis::models::{AnalysisInput, AnalysisResult, DetailedAnalysis};
use crate::analysis::projector::EditableResume;
use crate::analysis::report::{render_text_report, report_file_name};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// `AnalysisInput` plus an AI response the caller already holds.
#[derive(Debug, Deserialize)]
pub struct ParseResponseRequest {
    #[serde(flatten)]
    pub input: AnalysisInput,
    pub ai_response: String,
}

/// `AnalysisResult` plus the mirrored `detailed_analysis` view older consumers read.
#[derive(Debug, Serialize)]
pub struct AnalysisView {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub detailed_analysis: DetailedAnalysis,
}

impl From<AnalysisResult> for AnalysisView {
    fn from(result: AnalysisResult) -> Self {
        let detailed_analysis = result.detailed_analysis();
        Self {
            result,
            detailed_analysis,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisView,
    pub editable_resume: EditableResume,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

fn check_input(input: &AnalysisInput, limit: usize) -> Result<(), AppError> {
    check_length(&input.resume_text, limit)?;
    if let Some(jd) = input.job_description() {
        check_length(jd, limit)?;
    }
    Ok(())
}

/// Parses an AI response against its input and projects the editable resume.
fn build_response(
    state: &AppState,
    input: &AnalysisInput,
    ai_response: &str,
) -> Result<AnalyzeResponse, AppError> {
    let result = analyze(input, ai_response, state.config.score_fallback)?;
    info!(
        overall = result.overall_score,
        ats = result.ats_score,
        readability = result.readability_score,
        keyword = result.keyword_score,
        job_match = ?result.job_match_score,
        "Analysis assembled"
    );

    let editable_resume = EditableResume::from(&result.extracted_content);
    Ok(AnalyzeResponse {
        analysis: AnalysisView::from(result),
        editable_resume,
    })
}

async fn review_and_build(
    state: &AppState,
    input: AnalysisInput,
) -> Result<AnalyzeResponse, AppError> {
    check_input(&input, state.config.max_input_chars)?;

    info!(
        resume_chars = input.resume_text.len(),
        job_targeted = input.is_job_targeted(),
        "Requesting AI review"
    );
    let ai_response = state
        .reviewer
        .review(&input.resume_text, input.job_description())
        .await?;
    debug!(response_chars = ai_response.len(), "AI review received");

    build_response(state, &input, &ai_response)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Sends the resume (and optional job description) for AI review and returns the
/// structured analysis plus the editable resume projection.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalysisInput>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    Ok(Json(review_and_build(&state, input).await?))
}

/// POST /api/v1/analysis/parse
///
/// Re-parses an AI response the caller already has. No upstream call.
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(request): Json<ParseResponseRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    check_input(&request.input, state.config.max_input_chars)?;
    check_length(&request.ai_response, state.config.max_input_chars)?;

    Ok(Json(build_response(&state, &request.input, &request.ai_response)?))
}

/// POST /api/v1/analysis/upload
///
/// Multipart form: `file` (plain-text resume) and optional `job_description`.
/// PDF and Word documents are rejected; the user is asked to paste the text instead.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume_text = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                debug!(file_name = %file_name, size = bytes.len(), "Resume upload received");
                resume_text = Some(read_uploaded_text(&file_name, &bytes)?);
            }
            "job_description" => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read job_description: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let resume_text = resume_text
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    let input = AnalysisInput::new(resume_text, job_description);
    Ok(Json(review_and_build(&state, input).await?))
}

/// POST /api/v1/analysis/report
///
/// Flattens an analysis into the downloadable plain-text report.
pub async fn handle_report(Json(result): Json<AnalysisResult>) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", report_file_name(&result));
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_text_report(&result),
    )
}
