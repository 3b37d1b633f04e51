//! CSV export of report history

use hse_types::ReportRecord;

pub const CSV_MIME_TYPE: &str = "text/csv; charset=utf-8";

/// Column order of the export, matching the stored record
pub const CSV_COLUMNS: [&str; 8] = [
    "id",
    "job_title",
    "site_type",
    "location",
    "date",
    "auditor",
    "pdf_path",
    "risk_level",
];

/// Spreadsheets treat these leading characters as formulas
fn should_neutralize(value: &str) -> bool {
    matches!(value.chars().next(), Some('=' | '+' | '-' | '@'))
}

fn escape_field(value: &str) -> String {
    let value = if should_neutralize(value) {
        format!("'{}", value)
    } else {
        value.to_string()
    };
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}

fn record_fields(record: &ReportRecord) -> [String; 8] {
    [
        record.id.to_string(),
        record.job_title.clone(),
        record.site_type.clone(),
        record.location.clone(),
        record.date.clone(),
        record.auditor.clone(),
        record.pdf_path.clone(),
        record.risk_level.to_string(),
    ]
}

/// Serialize records in the given order, header row first
pub fn to_csv(records: &[ReportRecord]) -> String {
    let mut out = CSV_COLUMNS.join(",");
    out.push('\n');
    for record in records {
        let line = record_fields(record)
            .iter()
            .map(|f| escape_field(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Download name for an export, e.g. `hse_reports_red.csv`
pub fn export_filename(risk: Option<hse_types::RiskLevel>) -> String {
    match risk {
        Some(risk) => format!("hse_reports_{}.csv", risk.as_str().to_lowercase()),
        None => "hse_reports.csv".to_string(),
    }
}
