//! Config commands and shared utilities
//!
//! This module contains:
//! - `resolve_options` - Load matcher config and apply command-line overrides
//! - `cmd_config_show` - Print the effective configuration
//! - `cmd_config_path` - Print the user override location

use std::path::Path;

use anyhow::{Context, Result};
use sift_core::config::default_config_path;
use sift_core::{MatchOptions, SimilarityMetric};

/// Per-run overrides taken from `sift check` flags
#[derive(Debug, Default)]
pub struct OptionOverrides {
    pub date_tolerance_days: Option<i64>,
    pub amount_tolerance: Option<f64>,
    pub description_similarity_threshold: Option<f64>,
    pub confidence_threshold: Option<f64>,
    pub ignore_accounts: bool,
    pub metric: Option<String>,
}

/// Load config (explicit file, user override, or defaults), apply overrides,
/// and validate the result
pub fn resolve_options(config: Option<&Path>, overrides: &OptionOverrides) -> Result<MatchOptions> {
    let mut options = MatchOptions::load(config).context("Failed to load matcher config")?;

    if let Some(days) = overrides.date_tolerance_days {
        options.date_tolerance_days = days;
    }
    if let Some(tolerance) = overrides.amount_tolerance {
        options.amount_tolerance = tolerance;
    }
    if let Some(similarity) = overrides.description_similarity_threshold {
        options.description_similarity_threshold = similarity;
    }
    if let Some(threshold) = overrides.confidence_threshold {
        options.confidence_threshold = threshold;
    }
    if overrides.ignore_accounts {
        options.scope_by_account = false;
    }
    if let Some(ref metric) = overrides.metric {
        options.description_metric = metric
            .parse::<SimilarityMetric>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    options.validate().context("Invalid matcher options")?;
    Ok(options)
}

pub fn cmd_config_show(config: Option<&Path>) -> Result<()> {
    let options = MatchOptions::load(config).context("Failed to load matcher config")?;
    options.validate().context("Invalid matcher options")?;

    print!("{}", options.to_toml_string()?);
    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    let path = default_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory for this platform"))?;

    println!("{}", path.display());
    if !path.exists() {
        println!("   (not present; built-in defaults are used)");
    }
    Ok(())
}
