//! Domain models for Sift

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A transaction record, used for both candidates and existing records.
///
/// `date` and `amount` are optional so that rows that failed to parse can
/// still be carried into the matcher, which reports them instead of matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    /// Negative = expense, positive = income
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Opaque owning account reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: Some(date),
            description: description.into(),
            amount: Some(amount),
            category: None,
            account_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Required fields this record lacks (empty when the record is usable)
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push(RequiredField::Date);
        }
        if !self.amount.is_some_and(f64::is_finite) {
            missing.push(RequiredField::Amount);
        }
        missing
    }
}

/// Fields a record must carry to take part in matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredField {
    Date,
    Amount,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which input list a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSide {
    Candidate,
    Existing,
}

impl RecordSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Existing => "existing",
        }
    }
}

impl std::fmt::Display for RecordSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-field outcome of comparing a candidate with an existing record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatches {
    pub date: bool,
    pub amount: bool,
    pub description: bool,
    pub category: bool,
}

impl FieldMatches {
    pub fn all(&self) -> bool {
        self.date && self.amount && self.description && self.category
    }

    /// Number of matching fields
    pub fn count(&self) -> usize {
        [self.date, self.amount, self.description, self.category]
            .iter()
            .filter(|m| **m)
            .count()
    }
}

/// A candidate classified as a duplicate of an existing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Position of the candidate in the input batch
    pub candidate_index: usize,
    /// Position of the matched record in the existing list
    pub existing_index: usize,
    pub new_transaction: Transaction,
    pub existing_transaction: Transaction,
    /// Weighted match strength in [0, 1]
    pub confidence: f64,
    pub matches: FieldMatches,
    pub date_difference_days: i64,
    /// Raw description similarity in [0, 1]
    pub description_similarity: f64,
}

/// A candidate with no sufficiently strong match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonDuplicate {
    pub candidate_index: usize,
    pub transaction: Transaction,
    /// False when the candidate was skipped for missing data
    pub evaluated: bool,
    /// Strongest confidence seen against any existing record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_confidence: Option<f64>,
}

/// A record excluded from matching because it lacks required fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWarning {
    pub side: RecordSide,
    pub index: usize,
    pub missing: Vec<RequiredField>,
    pub message: String,
}

impl RecordWarning {
    pub fn new(side: RecordSide, index: usize, missing: Vec<RequiredField>) -> Self {
        let fields = missing
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("{} record {} skipped: missing {}", side, index, fields);
        Self {
            side,
            index,
            missing,
            message,
        }
    }
}

/// Batch counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total: usize,
    pub duplicates: usize,
    pub non_duplicates: usize,
    /// Candidates skipped for missing data (counted within `non_duplicates`)
    pub skipped: usize,
    pub duplicate_percentage: f64,
}

impl MatchSummary {
    pub fn new(duplicates: usize, non_duplicates: usize, skipped: usize) -> Self {
        let total = duplicates + non_duplicates;
        let duplicate_percentage = if total == 0 {
            0.0
        } else {
            duplicates as f64 / total as f64 * 100.0
        };
        Self {
            total,
            duplicates,
            non_duplicates,
            skipped,
            duplicate_percentage,
        }
    }
}

/// Result of classifying a candidate batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub duplicates: Vec<DuplicateMatch>,
    pub non_duplicates: Vec<NonDuplicate>,
    pub warnings: Vec<RecordWarning>,
    pub summary: MatchSummary,
}

impl DuplicateReport {
    /// Candidates that were not evaluated
    pub fn skipped(&self) -> impl Iterator<Item = &NonDuplicate> {
        self.non_duplicates.iter().filter(|n| !n.evaluated)
    }
}
