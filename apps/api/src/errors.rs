use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::assembler::AnalysisError;
use crate::analysis::intake::IntakeError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Analysis parse error: {0}")]
    AnalysisParse(#[from] AnalysisError),
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::UnsupportedFormat { .. } => AppError::UnsupportedFormat(err.to_string()),
            IntakeError::TooLong { .. } => AppError::Validation(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_FAILED",
                    "Analysis failed. Please try again.".to_string(),
                )
            }
            AppError::AnalysisParse(e) => {
                tracing::error!("Assembly failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "ANALYSIS_PARSE_FAILED",
                    "Failed to parse AI analysis results".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
