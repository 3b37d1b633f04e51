pub mod checklist;
pub mod record;
pub mod site;

pub use checklist::{ChecklistItem, ChecklistResponse, JobType, Language, ResponseStatus, RiskLevel};
pub use record::{DashboardStats, NewReportRecord, ReportFilter, ReportRecord};
pub use site::{SiteField, SiteInfo, ValidationError};
