//! HTTP handlers for the HSE report API

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use hse_report::export::{self, CSV_MIME_TYPE};
use hse_report::render::PDF_MIME_TYPE;
use hse_types::DashboardStats;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "hse-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /api/job-types
pub async fn list_job_types(State(state): State<Arc<AppState>>) -> Json<JobTypeListResponse> {
    let job_types = state.catalog().job_types().to_vec();
    let count = job_types.len();
    Json(JobTypeListResponse { job_types, count })
}

/// Handler: POST /api/reports
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<CreateReportResponse>), ApiError> {
    let request = req.into_inspection()?;
    debug!(
        "Received {} responses and {} images for {}",
        request.responses.len(),
        request.images.len(),
        request.job_type
    );

    let report = state.pipeline.submit(&request).await?;
    let pdf_sha256 = hex::encode(Sha256::digest(&report.pdf));
    info!("Created report {}: {}", report.record.id, report.filename);

    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponse {
            record: report.record,
            filename: report.filename,
            pdf_sha256,
        }),
    ))
}

/// Handler: GET /api/reports
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let filter = query.to_filter()?;
    let reports = state.store().query(&filter).await?;
    let count = reports.len();
    Ok(Json(ReportListResponse { reports, count }))
}

/// Handler: GET /api/reports/export.csv
pub async fn export_reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.to_filter()?;
    let reports = state.store().query(&filter).await?;
    info!("Exporting {} reports", reports.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition("attachment", &export::export_filename(filter.risk)),
            ),
        ],
        export::to_csv(&reports),
    ))
}

/// Handler: GET /api/reports/:id/pdf
pub async fn get_report_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .store()
        .get(id)
        .await?
        .ok_or(ApiError::ReportNotFound(id))?;

    let bytes = match tokio::fs::read(&record.pdf_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::PdfMissing {
                id,
                path: record.pdf_path,
            });
        }
        Err(e) => return Err(ApiError::Io(e)),
    };

    let filename = FsPath::new(&record.pdf_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("report_{}.pdf", id));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PDF_MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition("inline", &filename),
            ),
        ],
        bytes,
    ))
}

/// `filename` carries an ASCII fallback, `filename*` the exact UTF-8 name
fn content_disposition(kind: &str, filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();
    if fallback == filename {
        return format!("{}; filename=\"{}\"", kind, filename);
    }
    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        kind,
        fallback,
        urlencoding::encode(filename)
    )
}

/// Handler: GET /api/dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.store().stats().await?))
}
