//! Application state for the HSE report server

use hse_report::{Catalog, ReportPipeline, ReportStore};

pub struct AppState {
    pub pipeline: ReportPipeline,
}

impl AppState {
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self { pipeline }
    }

    pub fn catalog(&self) -> &Catalog {
        self.pipeline.catalog()
    }

    pub fn store(&self) -> &ReportStore {
        self.pipeline.store()
    }
}
