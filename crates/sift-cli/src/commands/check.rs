//! Duplicate check command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sift_core::{
    export::{non_duplicates_csv, report_to_json},
    import::load_file,
    DuplicateMatcher, DuplicateReport, ExportFormat, FieldMatches, MatchOptions, Transaction,
};
use tracing::info;

use super::truncate;

pub fn cmd_check(
    options: &MatchOptions,
    candidates_path: &Path,
    existing_path: &Path,
    format: &str,
    write_new: Option<&Path>,
    include_skipped: bool,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let candidates = load_file(candidates_path)
        .with_context(|| format!("Failed to load candidates: {}", candidates_path.display()))?;
    let existing = load_file(existing_path)
        .with_context(|| format!("Failed to load existing: {}", existing_path.display()))?;

    info!(
        "Checking {} candidates against {} existing transactions",
        candidates.len(),
        existing.len()
    );

    let matcher = DuplicateMatcher::new(options.clone()).context("Invalid matcher options")?;
    let report = matcher.find_duplicates(&candidates, &existing);

    match format {
        ExportFormat::Text => print!("{}", render_text(&report)),
        ExportFormat::Json => println!("{}", report_to_json(&report)?),
    }

    if let Some(path) = write_new {
        let csv = non_duplicates_csv(&report, include_skipped)?;
        fs::write(path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote non-duplicate transactions to {}", path.display());
    }

    Ok(())
}

/// Human-readable report
pub fn render_text(report: &DuplicateReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str("🔍 Duplicate check\n");
    out.push_str(&format!("   Candidates:     {}\n", summary.total));
    out.push_str(&format!(
        "   Duplicates:     {} ({:.1}%)\n",
        summary.duplicates, summary.duplicate_percentage
    ));
    out.push_str(&format!("   New:            {}\n", summary.non_duplicates));
    if summary.skipped > 0 {
        out.push_str(&format!("   Not evaluated:  {}\n", summary.skipped));
    }

    if !report.duplicates.is_empty() {
        out.push('\n');
        out.push_str("Likely duplicates:\n");
        for dup in &report.duplicates {
            out.push_str(&format!(
                "   #{:<4} {}  →  existing #{:<4} {}  {:>3.0}%  [{}]\n",
                dup.candidate_index + 1,
                describe(&dup.new_transaction),
                dup.existing_index + 1,
                describe(&dup.existing_transaction),
                dup.confidence * 100.0,
                matched_fields(&dup.matches)
            ));
        }
    }

    if !report.warnings.is_empty() {
        out.push('\n');
        out.push_str("⚠️  Skipped (missing data):\n");
        for warning in &report.warnings {
            out.push_str(&format!("   {}\n", warning.message));
        }
    }

    out
}

fn describe(tx: &Transaction) -> String {
    let date = tx
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "----------".to_string());
    let amount = tx
        .amount
        .map(|a| format!("{:.2}", a))
        .unwrap_or_else(|| "?".to_string());
    format!("{} {:<24} {:>10}", date, truncate(&tx.description, 24), amount)
}

fn matched_fields(matches: &FieldMatches) -> String {
    let fields = [
        ("date", matches.date),
        ("amount", matches.amount),
        ("description", matches.description),
        ("category", matches.category),
    ];
    fields
        .iter()
        .filter(|(_, hit)| *hit)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}
