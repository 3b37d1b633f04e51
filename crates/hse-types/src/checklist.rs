//! Checklist catalog entries, answers and the derived risk tier

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Report language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en", alias = "EN", alias = "English")]
    En,
    #[serde(rename = "fr", alias = "FR", alias = "Français", alias = "Francais")]
    Fr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

/// A single inspection point of a job type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Stable identifier (English canonical form)
    pub key: String,
    pub label_en: String,
    pub label_fr: String,
}

impl ChecklistItem {
    pub fn label(&self, language: Language) -> &str {
        match language {
            Language::En => &self.label_en,
            Language::Fr => &self.label_fr,
        }
    }
}

/// Named job type with its ordered checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobType {
    pub name: String,
    pub items: Vec<ChecklistItem>,
}

impl JobType {
    pub fn item(&self, key: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.key == key)
    }
}

/// Answer given to a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseStatus {
    Yes,
    No,
    #[serde(rename = "N/A", alias = "NotApplicable", alias = "NA")]
    NotApplicable,
}

impl ResponseStatus {
    /// Token printed in the checklist table
    pub fn token(&self) -> &'static str {
        match self {
            ResponseStatus::Yes => "Yes",
            ResponseStatus::No => "No",
            ResponseStatus::NotApplicable => "N/A",
        }
    }

    pub fn is_non_compliance(&self) -> bool {
        matches!(self, ResponseStatus::No)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    pub item_key: String,
    pub status: ResponseStatus,
    #[serde(default)]
    pub comment: String,
}

impl ChecklistResponse {
    pub fn new(item_key: impl Into<String>, status: ResponseStatus, comment: impl Into<String>) -> Self {
        Self {
            item_key: item_key.into(),
            status,
            comment: comment.into(),
        }
    }
}

/// Risk tier derived from the number of non-compliances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Green,
    Yellow,
    Red,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Green, RiskLevel::Yellow, RiskLevel::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Green => "Green",
            RiskLevel::Yellow => "Yellow",
            RiskLevel::Red => "Red",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(RiskLevel::Green),
            "yellow" => Ok(RiskLevel::Yellow),
            "red" => Ok(RiskLevel::Red),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens() {
        assert_eq!(ResponseStatus::Yes.token(), "Yes");
        assert_eq!(ResponseStatus::No.token(), "No");
        assert_eq!(ResponseStatus::NotApplicable.token(), "N/A");
    }

    #[test]
    fn test_status_deserializes_aliases() {
        let na: ResponseStatus = serde_json::from_str(r#""N/A""#).unwrap();
        let alias: ResponseStatus = serde_json::from_str(r#""NotApplicable""#).unwrap();
        assert_eq!(na, ResponseStatus::NotApplicable);
        assert_eq!(alias, ResponseStatus::NotApplicable);
    }

    #[test]
    fn test_response_comment_defaults_to_empty() {
        let resp: ChecklistResponse =
            serde_json::from_str(r#"{"item_key":"k","status":"No"}"#).unwrap();
        assert_eq!(resp.comment, "");
        assert!(resp.status.is_non_compliance());
    }

    #[test]
    fn test_risk_level_parse_is_case_insensitive() {
        assert_eq!("red".parse::<RiskLevel>().unwrap(), RiskLevel::Red);
        assert_eq!(" Yellow ".parse::<RiskLevel>().unwrap(), RiskLevel::Yellow);
        assert!("amber".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_risk_level_serializes_as_plain_word() {
        assert_eq!(serde_json::to_string(&RiskLevel::Green).unwrap(), r#""Green""#);
        assert_eq!(RiskLevel::Red.to_string(), "Red");
    }

    #[test]
    fn test_language_codes() {
        let fr: Language = serde_json::from_str(r#""fr""#).unwrap();
        let english: Language = serde_json::from_str(r#""English""#).unwrap();
        assert_eq!(fr, Language::Fr);
        assert_eq!(english, Language::En);
        assert_eq!(Language::Fr.code(), "fr");
    }
}
