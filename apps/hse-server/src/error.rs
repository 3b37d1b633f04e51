//! Error types for the HSE report server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hse_report::{PipelineError, RenderError, StoreError};
use hse_types::ValidationError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Report not found: {0}")]
    ReportNotFound(i64),

    #[error("PDF for report {id} is missing from {path}")]
    PdfMissing { id: i64, path: String },

    #[error(transparent)]
    Pipeline(PipelineError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) | PipelineError::Render(RenderError::Invalid(e)) => {
                ApiError::Validation(e)
            }
            other => ApiError::Pipeline(other),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            ApiError::ReportNotFound(id) => (
                StatusCode::NOT_FOUND,
                "REPORT_NOT_FOUND",
                format!("Report {} not found", id),
            ),
            ApiError::PdfMissing { id, path } => {
                tracing::warn!("PDF for report {} is missing at {}", id, path);
                (
                    StatusCode::NOT_FOUND,
                    "PDF_NOT_FOUND",
                    format!("PDF for report {} is no longer available", id),
                )
            }
            ApiError::Pipeline(PipelineError::Render(RenderError::UnsupportedCharacter {
                ..
            })) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_CHARACTER",
                self.to_string(),
            ),
            ApiError::Pipeline(e) => {
                tracing::error!("Report generation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPORT_FAILED",
                    "Report generation failed".to_string(),
                )
            }
            ApiError::Store(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Storage error".to_string(),
                )
            }
            ApiError::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "I/O error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
