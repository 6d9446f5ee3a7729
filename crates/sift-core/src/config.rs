//! Matcher configuration
//!
//! All thresholds the duplicate matcher uses live in [`MatchOptions`].
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a layered resolution:
//! 1. An explicit path (e.g. `--config`), which must exist
//! 2. An override in the data dir (~/.local/share/sift/config/matcher.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Partial files are allowed; missing keys take their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::similarity::SimilarityMetric;

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/matcher.toml");

/// Relative contribution of each field to the confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldWeights {
    pub date: f64,
    pub amount: f64,
    pub description: f64,
    pub category: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            date: 0.30,
            amount: 0.35,
            description: 0.25,
            category: 0.10,
        }
    }
}

impl FieldWeights {
    pub fn sum(&self) -> f64 {
        self.date + self.amount + self.description + self.category
    }

    fn as_array(&self) -> [(&'static str, f64); 4] {
        [
            ("date", self.date),
            ("amount", self.amount),
            ("description", self.description),
            ("category", self.category),
        ]
    }

    /// Scale the weights so they sum to 1
    pub fn normalized(&self) -> Result<FieldWeights> {
        for (name, weight) in self.as_array() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "field weight '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        let sum = self.sum();
        if sum <= 0.0 {
            return Err(Error::InvalidConfig(
                "field weights sum to zero and cannot be normalized".into(),
            ));
        }
        if !sum.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "field weights sum overflows ({}) and cannot be normalized",
                sum
            )));
        }

        Ok(FieldWeights {
            date: self.date / sum,
            amount: self.amount / sum,
            description: self.description / sum,
            category: self.category / sum,
        })
    }
}

/// Duplicate matcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchOptions {
    /// Dates within this many days count as a date match
    pub date_tolerance_days: i64,
    /// Absolute amount difference still counted as the same amount
    pub amount_tolerance: f64,
    /// Minimum description similarity in [0, 1]
    pub description_similarity_threshold: f64,
    /// Minimum weighted confidence in [0, 1] for a duplicate
    pub confidence_threshold: f64,
    /// Only compare records of the same account when both carry one
    pub scope_by_account: bool,
    /// Metric used to score descriptions
    pub description_metric: SimilarityMetric,
    pub field_weights: FieldWeights,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            date_tolerance_days: 2,
            amount_tolerance: 0.0,
            description_similarity_threshold: 0.7,
            confidence_threshold: 0.8,
            scope_by_account: true,
            description_metric: SimilarityMetric::Levenshtein,
            field_weights: FieldWeights::default(),
        }
    }
}

impl MatchOptions {
    /// Parse a (possibly partial) TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration (explicit path, then user override, then defaults)
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(Error::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading matcher config from {}", path.display());
            return Self::from_toml_str(&fs::read_to_string(path)?);
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                debug!("Loading matcher config override from {}", path.display());
                return Self::from_toml_str(&fs::read_to_string(&path)?);
            }
        }

        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Check every setting and return the normalized field weights.
    ///
    /// Fails on negative or non-finite tolerances, thresholds outside [0, 1],
    /// and weights that cannot be normalized.
    pub fn validate(&self) -> Result<FieldWeights> {
        if self.date_tolerance_days < 0 {
            return Err(Error::InvalidConfig(format!(
                "date_tolerance_days must be >= 0, got {}",
                self.date_tolerance_days
            )));
        }

        if !self.amount_tolerance.is_finite() || self.amount_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "amount_tolerance must be a non-negative number, got {}",
                self.amount_tolerance
            )));
        }

        check_unit_interval(
            "description_similarity_threshold",
            self.description_similarity_threshold,
        )?;
        check_unit_interval("confidence_threshold", self.confidence_threshold)?;

        self.field_weights.normalized()
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("sift").join("config").join("matcher.toml"))
}
