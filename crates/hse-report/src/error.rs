use std::path::PathBuf;

use hse_types::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains no job types")]
    Empty,

    #[error("Job type at position {0} has an empty name")]
    UnnamedJobType(usize),

    #[error("Duplicate job type: {0}")]
    DuplicateJobType(String),

    #[error("Job type '{0}' has no checklist items")]
    NoItems(String),

    #[error("Job type '{job_type}' has an item with an empty key")]
    EmptyItemKey { job_type: String },

    #[error("Job type '{job_type}' lists item '{key}' more than once")]
    DuplicateItem { job_type: String, key: String },

    #[error("Item '{key}' of job type '{job_type}' is missing its {language} label")]
    MissingLabel {
        job_type: String,
        key: String,
        language: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid report input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Unsupported character {ch:?} in {context}")]
    UnsupportedCharacter { ch: char, context: String },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt report row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

/// Failure of a full submission, tagged by the stage that failed
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The PDF was written but its record could not be stored
    #[error("Report written to {} but not recorded: {source}", .pdf_path.display())]
    Store {
        pdf_path: PathBuf,
        #[source]
        source: StoreError,
    },
}
