//! Site metadata captured for an inspection and its validation

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted inspection date format (ISO 8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Site fields in the order they appear on the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteField {
    JobTitle,
    SiteType,
    Location,
    Date,
    Auditor,
}

impl SiteField {
    pub const ALL: [SiteField; 5] = [
        SiteField::JobTitle,
        SiteField::SiteType,
        SiteField::Location,
        SiteField::Date,
        SiteField::Auditor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SiteField::JobTitle => "job_title",
            SiteField::SiteType => "site_type",
            SiteField::Location => "location",
            SiteField::Date => "date",
            SiteField::Auditor => "auditor",
        }
    }
}

impl fmt::Display for SiteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input rejected before any document is rendered or stored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(SiteField),

    #[error("Invalid inspection date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown job type: {0}")]
    UnknownJobType(String),

    #[error("Job title '{job_title}' does not match the selected job type '{job_type}'")]
    JobTitleMismatch { job_type: String, job_title: String },

    #[error("Unknown checklist item '{key}' for job type '{job_type}'")]
    UnknownItem { job_type: String, key: String },

    #[error("Duplicate response for checklist item '{0}'")]
    DuplicateResponse(String),

    #[error("No response for checklist item '{0}'")]
    MissingResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub job_title: String,
    pub site_type: String,
    pub location: String,
    /// ISO 8601 calendar date (YYYY-MM-DD)
    pub date: String,
    pub auditor: String,
}

impl SiteInfo {
    pub fn get(&self, field: SiteField) -> &str {
        match field {
            SiteField::JobTitle => &self.job_title,
            SiteField::SiteType => &self.site_type,
            SiteField::Location => &self.location,
            SiteField::Date => &self.date,
            SiteField::Auditor => &self.auditor,
        }
    }

    /// Fields paired with their values, in report order
    pub fn fields(&self) -> impl Iterator<Item = (SiteField, &str)> + '_ {
        SiteField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Check every field is present and the date parses.
    ///
    /// Returns the parsed inspection date.
    pub fn validate(&self) -> Result<NaiveDate, ValidationError> {
        for (field, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(self.date.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn site() -> SiteInfo {
        SiteInfo {
            job_title: "Wireline Operation".to_string(),
            site_type: "Onshore".to_string(),
            location: "Pad 4".to_string(),
            date: "2024-05-01".to_string(),
            auditor: "Jane Doe".to_string(),
        }
    }

    #[test]
    fn test_valid_site_returns_date() {
        let date = site().validate().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_empty_location_is_rejected() {
        let mut s = site();
        s.location = String::new();
        assert_eq!(
            s.validate(),
            Err(ValidationError::MissingField(SiteField::Location))
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let mut s = site();
        s.auditor = "   ".to_string();
        assert_eq!(
            s.validate(),
            Err(ValidationError::MissingField(SiteField::Auditor))
        );
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        for bad in ["01/05/2024", "2024-13-01", "2024-02-30", "yesterday"] {
            let mut s = site();
            s.date = bad.to_string();
            assert_eq!(
                s.validate(),
                Err(ValidationError::InvalidDate(bad.to_string())),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_fields_follow_report_order() {
        let s = site();
        let names: Vec<&str> = s.fields().map(|(f, _)| f.name()).collect();
        assert_eq!(
            names,
            vec!["job_title", "site_type", "location", "date", "auditor"]
        );
    }
}
