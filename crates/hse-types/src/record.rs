//! Persisted report rows and history filters

use serde::{Deserialize, Serialize};

use crate::checklist::RiskLevel;

/// Summary row stored once per generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: i64,
    pub job_title: String,
    pub site_type: String,
    pub location: String,
    pub date: String,
    pub auditor: String,
    pub pdf_path: String,
    pub risk_level: RiskLevel,
}

/// A report row before the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReportRecord {
    pub job_title: String,
    pub site_type: String,
    pub location: String,
    pub date: String,
    pub auditor: String,
    pub pdf_path: String,
    pub risk_level: RiskLevel,
}

impl NewReportRecord {
    pub fn with_id(self, id: i64) -> ReportRecord {
        ReportRecord {
            id,
            job_title: self.job_title,
            site_type: self.site_type,
            location: self.location,
            date: self.date,
            auditor: self.auditor,
            pdf_path: self.pdf_path,
            risk_level: self.risk_level,
        }
    }
}

/// History filter; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    /// Case-insensitive substring of the auditor name
    #[serde(default)]
    pub auditor_substring: Option<String>,
}

impl ReportFilter {
    pub fn risk(risk: RiskLevel) -> Self {
        Self {
            risk: Some(risk),
            ..Self::default()
        }
    }

    pub fn auditor(substring: impl Into<String>) -> Self {
        Self {
            auditor_substring: Some(substring.into()),
            ..Self::default()
        }
    }
}

/// Counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: i64,
    pub green: i64,
    pub yellow: i64,
    pub red: i64,
}
