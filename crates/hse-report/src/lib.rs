//! HSE inspection report assembly
//!
//! Turns a completed checklist into a risk rating, a PDF report and a row in
//! the report history:
//! - `catalog`: job types and their checklist items
//! - `risk`: Green / Yellow / Red rating from the number of `No` answers
//! - `render`: PDF rendering with lopdf
//! - `store`: append-only SQLite history with filtered queries
//! - `export`: CSV export of the history
//! - `pipeline`: the full validate → classify → render → record sequence

pub mod catalog;
pub mod error;
pub mod export;
pub mod i18n;
pub mod pipeline;
pub mod render;
pub mod risk;
pub mod sanitize;
pub mod store;

pub use catalog::{BoundResponse, Catalog};
pub use error::{CatalogError, PipelineError, RenderError, StoreError};
pub use export::to_csv;
pub use pipeline::{GeneratedReport, InspectionRequest, ReportPipeline};
pub use render::{render, ImageAttachment, RenderedReport};
pub use risk::{classify, YELLOW_MAX_NON_COMPLIANCES};
pub use store::ReportStore;
