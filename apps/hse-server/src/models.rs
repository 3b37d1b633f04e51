//! Request and response bodies for the HSE report API

use std::path::Path;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hse_report::{ImageAttachment, InspectionRequest};
use hse_types::{ChecklistResponse, JobType, Language, ReportFilter, ReportRecord, RiskLevel, SiteInfo};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Largest accepted image after base64 decoding
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct JobTypeListResponse {
    pub job_types: Vec<JobType>,
    pub count: usize,
}

/// An uploaded photo
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub name: String,
    pub data_base64: String,
}

impl ImageUpload {
    /// Check the file type and size, then decode the payload
    pub fn into_attachment(self) -> Result<ImageAttachment, ApiError> {
        if !has_image_extension(&self.name) {
            return Err(ApiError::InvalidRequest(format!(
                "Image '{}' must be one of: {}",
                self.name,
                IMAGE_EXTENSIONS.join(", ")
            )));
        }
        // Base64 expands by 4/3; reject before allocating
        if self.data_base64.len() / 4 * 3 > MAX_IMAGE_BYTES + 3 {
            return Err(too_large(&self.name));
        }
        let bytes = BASE64
            .decode(self.data_base64.trim())
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid base64 for '{}': {}", self.name, e)))?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(too_large(&self.name));
        }
        Ok(ImageAttachment::new(self.name, bytes))
    }
}

fn too_large(name: &str) -> ApiError {
    ApiError::InvalidRequest(format!(
        "Image '{}' exceeds {} MiB",
        name,
        MAX_IMAGE_BYTES / (1024 * 1024)
    ))
}

pub fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Submit a completed checklist
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportRequest {
    pub job_type: String,
    pub site: SiteInfo,
    pub responses: Vec<ChecklistResponse>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub images: Vec<ImageUpload>,
}

impl CreateReportRequest {
    pub fn into_inspection(self) -> Result<InspectionRequest, ApiError> {
        let images = self
            .images
            .into_iter()
            .map(ImageUpload::into_attachment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InspectionRequest {
            job_type: self.job_type,
            site: self.site,
            responses: self.responses,
            language: self.language,
            images,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateReportResponse {
    pub record: ReportRecord,
    pub filename: String,
    pub pdf_sha256: String,
}

/// History filter as sent in the query string
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub risk: Option<String>,
    pub auditor: Option<String>,
}

impl ReportQuery {
    /// Empty values and `all` mean "no filter"
    pub fn to_filter(&self) -> Result<ReportFilter, ApiError> {
        let risk = match self.risk.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(RiskLevel::from_str(r).map_err(ApiError::InvalidRequest)?),
        };
        let auditor_substring = self
            .auditor
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        Ok(ReportFilter {
            risk,
            auditor_substring,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ReportRecord>,
    pub count: usize,
}
