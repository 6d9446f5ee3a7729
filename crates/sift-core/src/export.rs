//! Report export
//!
//! Supports:
//! - Full JSON report of a match run
//! - CSV of the candidates that are not duplicates, ready for import

use csv::WriterBuilder;

use crate::error::{Error, Result};
use crate::models::DuplicateReport;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Render the whole report as pretty JSON
pub fn report_to_json(report: &DuplicateReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the non-duplicate candidates as CSV.
///
/// Candidates skipped for missing data are left out unless `include_skipped`
/// is set, in which case their missing cells are written empty.
pub fn non_duplicates_csv(report: &DuplicateReport, include_skipped: bool) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(["date", "description", "amount", "category", "account"])?;

    for entry in &report.non_duplicates {
        if !entry.evaluated && !include_skipped {
            continue;
        }
        let tx = &entry.transaction;
        wtr.write_record([
            tx.date.map(|d| d.to_string()).unwrap_or_default(),
            tx.description.clone(),
            tx.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
            tx.category.clone().unwrap_or_default(),
            tx.account_id.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::Import(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Import(format!("Invalid UTF-8 in CSV: {}", e)))
}
