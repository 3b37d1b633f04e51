//! Static report strings in English and French

use hse_types::{Language, RiskLevel, SiteField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    Title,
    Risk,
    Checklist,
    Item,
    Status,
    Comment,
    NonCompliances,
    NoNonCompliances,
    Evidence,
    Page,
}

impl Phrase {
    pub fn text(self, language: Language) -> &'static str {
        use Language::*;
        use Phrase::*;
        match (self, language) {
            (Title, En) => "HSE Diagnostic Report",
            (Title, Fr) => "Rapport de diagnostic HSE",
            (Risk, En) => "Risk Level",
            (Risk, Fr) => "Niveau de risque",
            (Checklist, En) => "Checklist",
            (Checklist, Fr) => "Liste de contrôle",
            (Item, En) => "Item",
            (Item, Fr) => "Élément",
            (Status, En) => "Status",
            (Status, Fr) => "Statut",
            (Comment, En) => "Comment",
            (Comment, Fr) => "Commentaire",
            (NonCompliances, En) => "Non-compliances",
            (NonCompliances, Fr) => "Non-conformités",
            (NoNonCompliances, En) => "No non-compliances recorded.",
            (NoNonCompliances, Fr) => "Aucune non-conformité relevée.",
            (Evidence, En) => "Evidence image",
            (Evidence, Fr) => "Image justificative",
            (Page, En) => "Page",
            (Page, Fr) => "Page",
        }
    }
}

/// Label shown before a site field in the metadata block
pub fn site_field_label(field: SiteField, language: Language) -> &'static str {
    match (field, language) {
        (SiteField::JobTitle, Language::En) => "HSE Job Responsibility",
        (SiteField::JobTitle, Language::Fr) => "Responsabilité HSE",
        (SiteField::SiteType, Language::En) => "Site Type",
        (SiteField::SiteType, Language::Fr) => "Type de site",
        (SiteField::Location, Language::En) => "Site Location",
        (SiteField::Location, Language::Fr) => "Lieu du site",
        (SiteField::Date, Language::En) => "Inspection Date",
        (SiteField::Date, Language::Fr) => "Date d'inspection",
        (SiteField::Auditor, Language::En) => "Auditor Name",
        (SiteField::Auditor, Language::Fr) => "Nom de l'inspecteur",
    }
}

pub fn risk_label(risk: RiskLevel, language: Language) -> &'static str {
    match (risk, language) {
        (_, Language::En) => risk.as_str(),
        (RiskLevel::Green, Language::Fr) => "Vert",
        (RiskLevel::Yellow, Language::Fr) => "Jaune",
        (RiskLevel::Red, Language::Fr) => "Rouge",
    }
}

/// Translate the known site types; anything else is shown as entered
pub fn site_type_label(site_type: &str, language: Language) -> &str {
    if language == Language::En {
        return site_type;
    }
    match site_type.trim() {
        "Onshore" => "Terrestre",
        "Offshore" => "En mer",
        "Support" => "Zone de soutien",
        _ => site_type,
    }
}
