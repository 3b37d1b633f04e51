//! Risk classification from checklist answers

use hse_types::{ChecklistResponse, ResponseStatus, RiskLevel};

/// Highest number of non-compliances that still rates Yellow
pub const YELLOW_MAX_NON_COMPLIANCES: usize = 2;

/// Count the responses answered `No`
pub fn count_non_compliances<'a, I>(statuses: I) -> usize
where
    I: IntoIterator<Item = &'a ResponseStatus>,
{
    statuses
        .into_iter()
        .filter(|s| s.is_non_compliance())
        .count()
}

pub fn risk_for_count(non_compliances: usize) -> RiskLevel {
    match non_compliances {
        0 => RiskLevel::Green,
        n if n <= YELLOW_MAX_NON_COMPLIANCES => RiskLevel::Yellow,
        _ => RiskLevel::Red,
    }
}

/// Rate a submission. Only the number of `No` answers matters.
pub fn classify(responses: &[ChecklistResponse]) -> RiskLevel {
    risk_for_count(count_non_compliances(responses.iter().map(|r| &r.status)))
}
