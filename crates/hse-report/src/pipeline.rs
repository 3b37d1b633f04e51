//! Report assembly: validate, classify, render, write, record
//!
//! Each submission runs to completion before `submit` returns. The PDF is
//! always written before the record is appended, so a record never points
//! at a missing file. The reverse can happen: if the append fails the PDF
//! stays on disk and the caller receives its path in
//! [`PipelineError::Store`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use hse_types::{ChecklistResponse, Language, NewReportRecord, ReportRecord, SiteInfo, ValidationError};
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::error::{PipelineError, RenderError};
use crate::render::{self, ImageAttachment};
use crate::risk;
use crate::store::ReportStore;

/// Everything the form driver collects for one report
#[derive(Debug, Clone)]
pub struct InspectionRequest {
    pub job_type: String,
    pub site: SiteInfo,
    pub responses: Vec<ChecklistResponse>,
    pub language: Language,
    pub images: Vec<ImageAttachment>,
}

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub record: ReportRecord,
    pub filename: String,
    pub pdf: Vec<u8>,
}

pub struct ReportPipeline {
    catalog: Catalog,
    store: ReportStore,
    output_dir: PathBuf,
    unique_filenames: bool,
}

impl ReportPipeline {
    pub fn new(catalog: Catalog, store: ReportStore, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            store,
            output_dir: output_dir.into(),
            unique_filenames: false,
        }
    }

    /// Append a timestamp to file names so repeat inspections of the same
    /// site and job do not overwrite each other
    pub fn with_unique_filenames(mut self, enabled: bool) -> Self {
        self.unique_filenames = enabled;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn output_filename(&self, canonical: String) -> String {
        if !self.unique_filenames {
            return canonical;
        }
        let stem = canonical.strip_suffix(".pdf").unwrap_or(&canonical);
        format!("{}_{}.pdf", stem, Utc::now().format("%Y%m%dT%H%M%S%6f"))
    }

    pub async fn submit(&self, request: &InspectionRequest) -> Result<GeneratedReport, PipelineError> {
        let site = &request.site;
        let date = site.validate()?;
        let bound = self
            .catalog
            .bind_responses(&request.job_type, &request.responses)?;
        // The title printed and stored must name the checklist that was answered
        if site.job_title.trim() != request.job_type {
            return Err(ValidationError::JobTitleMismatch {
                job_type: request.job_type.clone(),
                job_title: site.job_title.trim().to_string(),
            }
            .into());
        }

        let risk = risk::classify(&request.responses);
        info!(
            "Generating {} report for {} at {}: risk {}",
            request.job_type, site.auditor, site.location, risk
        );

        let rendered = render::render(site, &bound, risk, request.language, &request.images)?;
        let filename = self.output_filename(rendered.filename);
        let pdf_path = self.output_dir.join(&filename);

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| RenderError::Write {
                path: self.output_dir.clone(),
                source,
            })?;
        tokio::fs::write(&pdf_path, &rendered.bytes)
            .await
            .map_err(|source| RenderError::Write {
                path: pdf_path.clone(),
                source,
            })?;

        let record = NewReportRecord {
            job_title: site.job_title.trim().to_string(),
            site_type: site.site_type.trim().to_string(),
            location: site.location.trim().to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            auditor: site.auditor.trim().to_string(),
            pdf_path: pdf_path.display().to_string(),
            risk_level: risk,
        };

        match self.store.append(&record).await {
            Ok(id) => Ok(GeneratedReport {
                record: record.with_id(id),
                filename,
                pdf: rendered.bytes,
            }),
            Err(source) => {
                error!(
                    "Report written to {} but its record was not stored: {}",
                    pdf_path.display(),
                    source
                );
                Err(PipelineError::Store { pdf_path, source })
            }
        }
    }
}
