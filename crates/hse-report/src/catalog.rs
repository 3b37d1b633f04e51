//! Checklist catalog
//!
//! Job types and their ordered checklist items. The built-in catalog is
//! embedded at compile time; alternative catalogs can be loaded from JSON.
//! Every catalog is validated on load so a missing translation fails at
//! startup instead of surfacing as a blank label in a report.

use std::collections::HashSet;
use std::path::Path;

use hse_types::{ChecklistItem, ChecklistResponse, JobType, Language, ValidationError};

use crate::error::CatalogError;

/// Built-in job types - loaded from data/job_types.json
const BUILTIN_CATALOG: &str = include_str!("../data/job_types.json");

/// A checklist response paired with the catalog item it answers
#[derive(Debug, Clone, Copy)]
pub struct BoundResponse<'a> {
    pub item: &'a ChecklistItem,
    pub response: &'a ChecklistResponse,
}

impl BoundResponse<'_> {
    pub fn label(&self, language: Language) -> &str {
        self.item.label(language)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    job_types: Vec<JobType>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let job_types: Vec<JobType> = serde_json::from_str(json)?;
        Self::new(job_types)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn new(job_types: Vec<JobType>) -> Result<Self, CatalogError> {
        validate(&job_types)?;
        Ok(Self { job_types })
    }

    pub fn job_types(&self) -> &[JobType] {
        &self.job_types
    }

    pub fn job_type(&self, name: &str) -> Option<&JobType> {
        self.job_types.iter().find(|j| j.name == name)
    }

    /// Match responses to the items of `job_type`, in catalog order.
    ///
    /// Every item must be answered exactly once and no response may refer to
    /// an item outside the job type.
    pub fn bind_responses<'a>(
        &'a self,
        job_type: &str,
        responses: &'a [ChecklistResponse],
    ) -> Result<Vec<BoundResponse<'a>>, ValidationError> {
        let job = self
            .job_type(job_type)
            .ok_or_else(|| ValidationError::UnknownJobType(job_type.to_string()))?;

        let mut seen = HashSet::new();
        for response in responses {
            if job.item(&response.item_key).is_none() {
                return Err(ValidationError::UnknownItem {
                    job_type: job.name.clone(),
                    key: response.item_key.clone(),
                });
            }
            if !seen.insert(response.item_key.as_str()) {
                return Err(ValidationError::DuplicateResponse(response.item_key.clone()));
            }
        }

        job.items
            .iter()
            .map(|item| {
                responses
                    .iter()
                    .find(|r| r.item_key == item.key)
                    .map(|response| BoundResponse { item, response })
                    .ok_or_else(|| ValidationError::MissingResponse(item.key.clone()))
            })
            .collect()
    }
}

fn validate(job_types: &[JobType]) -> Result<(), CatalogError> {
    if job_types.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut names = HashSet::new();
    for (index, job) in job_types.iter().enumerate() {
        if job.name.trim().is_empty() {
            return Err(CatalogError::UnnamedJobType(index));
        }
        if !names.insert(job.name.as_str()) {
            return Err(CatalogError::DuplicateJobType(job.name.clone()));
        }
        if job.items.is_empty() {
            return Err(CatalogError::NoItems(job.name.clone()));
        }

        let mut keys = HashSet::new();
        for item in &job.items {
            if item.key.trim().is_empty() {
                return Err(CatalogError::EmptyItemKey {
                    job_type: job.name.clone(),
                });
            }
            if !keys.insert(item.key.as_str()) {
                return Err(CatalogError::DuplicateItem {
                    job_type: job.name.clone(),
                    key: item.key.clone(),
                });
            }
            for (language, label) in [("English", &item.label_en), ("French", &item.label_fr)] {
                if label.trim().is_empty() {
                    return Err(CatalogError::MissingLabel {
                        job_type: job.name.clone(),
                        key: item.key.clone(),
                        language,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hse_types::ResponseStatus;
    use pretty_assertions::assert_eq;

    const WIRELINE: &str = "Wireline Operation";

    fn answers(catalog: &Catalog, status: ResponseStatus) -> Vec<ChecklistResponse> {
        catalog
            .job_type(WIRELINE)
            .unwrap()
            .items
            .iter()
            .map(|item| ChecklistResponse::new(item.key.clone(), status, ""))
            .collect()
    }

    #[test]
    fn test_builtin_catalog_has_wireline_checklist() {
        let catalog = Catalog::builtin().unwrap();
        let job = catalog.job_type(WIRELINE).unwrap();
        assert_eq!(job.items.len(), 8);
        assert_eq!(job.items[1].label_fr, "Permis de travail signé et affiché");
        assert_eq!(
            job.items[0].label(Language::En),
            "Pre-job safety meeting held (Toolbox Talk)"
        );
    }

    #[test]
    fn test_missing_french_label_fails_fast() {
        let json = r#"[{"name":"Scaffolding","items":[
            {"key":"Tags current","label_en":"Tags current","label_fr":""}
        ]}]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingLabel { language: "French", .. }
        ));
    }

    #[test]
    fn test_duplicate_item_key_rejected() {
        let json = r#"[{"name":"Lifting","items":[
            {"key":"Sling","label_en":"Sling","label_fr":"Elingue"},
            {"key":"Sling","label_en":"Sling","label_fr":"Elingue"}
        ]}]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateItem { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(Catalog::from_json("[]"), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_bind_orders_by_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let mut responses = answers(&catalog, ResponseStatus::Yes);
        responses.reverse();

        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let keys: Vec<&str> = bound.iter().map(|b| b.item.key.as_str()).collect();
        let expected: Vec<&str> = catalog
            .job_type(WIRELINE)
            .unwrap()
            .items
            .iter()
            .map(|i| i.key.as_str())
            .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_bind_rejects_unknown_item() {
        let catalog = Catalog::builtin().unwrap();
        let mut responses = answers(&catalog, ResponseStatus::Yes);
        responses.push(ChecklistResponse::new("Crane certified", ResponseStatus::Yes, ""));
        assert!(matches!(
            catalog.bind_responses(WIRELINE, &responses),
            Err(ValidationError::UnknownItem { .. })
        ));
    }

    #[test]
    fn test_bind_rejects_duplicate_and_missing() {
        let catalog = Catalog::builtin().unwrap();
        let mut responses = answers(&catalog, ResponseStatus::Yes);
        let first = responses[0].clone();
        responses.push(first);
        assert!(matches!(
            catalog.bind_responses(WIRELINE, &responses),
            Err(ValidationError::DuplicateResponse(_))
        ));

        let mut responses = answers(&catalog, ResponseStatus::Yes);
        responses.pop();
        assert_eq!(
            catalog.bind_responses(WIRELINE, &responses).unwrap_err(),
            ValidationError::MissingResponse(
                "Post-job cleanup & waste disposal verified".to_string()
            )
        );
    }

    #[test]
    fn test_bind_rejects_unknown_job_type() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.bind_responses("Diving", &[]).unwrap_err(),
            ValidationError::UnknownJobType("Diving".to_string())
        );
    }
}
