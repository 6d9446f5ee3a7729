//! Duplicate transaction matching
//!
//! Classifies each candidate (freshly imported) transaction as a duplicate of
//! an existing record or as new. Every candidate is compared against every
//! in-scope existing record:
//!
//! - Date: day difference within `date_tolerance_days`
//! - Amount: same sign, difference within `amount_tolerance` (cent precision)
//! - Description: normalized similarity at or above the threshold
//! - Category: both present and equal (absence never matches)
//!
//! The confidence of a pair is the weighted sum of those indicators. The best
//! pair wins by confidence, then smallest date difference, then first
//! occurrence in `existing`. Candidates are never compared with each other.

use tracing::{debug, trace, warn};

use crate::config::{FieldWeights, MatchOptions};
use crate::error::Result;
use crate::models::{
    DuplicateMatch, DuplicateReport, FieldMatches, MatchSummary, NonDuplicate, RecordSide,
    RecordWarning, Transaction,
};
use crate::similarity::description_similarity;

/// Confidence values closer than this are treated as tied
const CONFIDENCE_EPSILON: f64 = 1e-9;

/// Classify `candidates` against `existing` with the given options.
///
/// Fails only on invalid configuration, before any record is compared.
pub fn find_duplicates(
    candidates: &[Transaction],
    existing: &[Transaction],
    options: &MatchOptions,
) -> Result<DuplicateReport> {
    let matcher = DuplicateMatcher::new(options.clone())?;
    Ok(matcher.find_duplicates(candidates, existing))
}

/// Reusable matcher holding validated options
#[derive(Debug, Clone)]
pub struct DuplicateMatcher {
    options: MatchOptions,
    weights: FieldWeights,
}

/// Score of one candidate/existing pair
#[derive(Debug, Clone, Copy)]
struct PairScore {
    existing_index: usize,
    confidence: f64,
    matches: FieldMatches,
    date_difference_days: i64,
    description_similarity: f64,
}

impl PairScore {
    /// Whether this score should replace `current` as the best pair
    fn beats(&self, current: &PairScore) -> bool {
        if self.confidence > current.confidence + CONFIDENCE_EPSILON {
            return true;
        }
        if self.confidence < current.confidence - CONFIDENCE_EPSILON {
            return false;
        }
        // Later indices only win on a strictly smaller date difference
        self.date_difference_days < current.date_difference_days
    }
}

impl DuplicateMatcher {
    /// Validate the options and build a matcher
    pub fn new(options: MatchOptions) -> Result<Self> {
        let weights = options.validate()?;
        Ok(Self { options, weights })
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Normalized field weights in use
    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Partition `candidates` into duplicates and non-duplicates.
    ///
    /// Both output lists keep the candidates' input order. Records missing a
    /// date or amount are excluded and reported in `warnings`.
    pub fn find_duplicates(
        &self,
        candidates: &[Transaction],
        existing: &[Transaction],
    ) -> DuplicateReport {
        let mut warnings = Vec::new();
        let mut candidate_skips = Vec::with_capacity(candidates.len());

        for (index, tx) in candidates.iter().enumerate() {
            let missing = tx.missing_fields();
            let skipped = !missing.is_empty();
            if skipped {
                let warning = RecordWarning::new(RecordSide::Candidate, index, missing);
                warn!("{}", warning.message);
                warnings.push(warning);
            }
            candidate_skips.push(skipped);
        }

        let mut comparable = Vec::with_capacity(existing.len());
        for (index, tx) in existing.iter().enumerate() {
            let missing = tx.missing_fields();
            if missing.is_empty() {
                comparable.push((index, tx));
            } else {
                let warning = RecordWarning::new(RecordSide::Existing, index, missing);
                warn!("{}", warning.message);
                warnings.push(warning);
            }
        }

        let mut duplicates = Vec::new();
        let mut non_duplicates = Vec::new();
        let mut skipped = 0;

        for ((candidate_index, candidate), is_skipped) in
            candidates.iter().enumerate().zip(candidate_skips)
        {
            if is_skipped {
                skipped += 1;
                non_duplicates.push(NonDuplicate {
                    candidate_index,
                    transaction: candidate.clone(),
                    evaluated: false,
                    best_confidence: None,
                });
                continue;
            }

            let best = self.best_match(candidate, &comparable);

            match best {
                Some(score) if score.confidence >= self.options.confidence_threshold => {
                    trace!(
                        candidate_index,
                        existing_index = score.existing_index,
                        confidence = score.confidence,
                        "Duplicate found"
                    );
                    duplicates.push(DuplicateMatch {
                        candidate_index,
                        existing_index: score.existing_index,
                        new_transaction: candidate.clone(),
                        existing_transaction: existing[score.existing_index].clone(),
                        confidence: score.confidence,
                        matches: score.matches,
                        date_difference_days: score.date_difference_days,
                        description_similarity: score.description_similarity,
                    });
                }
                _ => {
                    non_duplicates.push(NonDuplicate {
                        candidate_index,
                        transaction: candidate.clone(),
                        evaluated: true,
                        best_confidence: best.map(|s| s.confidence),
                    });
                }
            }
        }

        let summary = MatchSummary::new(duplicates.len(), non_duplicates.len(), skipped);

        debug!(
            "Matched {} candidates against {} existing: {} duplicates, {} new, {} skipped",
            summary.total,
            existing.len(),
            summary.duplicates,
            summary.non_duplicates,
            summary.skipped
        );

        DuplicateReport {
            duplicates,
            non_duplicates,
            warnings,
            summary,
        }
    }

    /// Highest-scoring existing record for one candidate
    fn best_match(
        &self,
        candidate: &Transaction,
        comparable: &[(usize, &Transaction)],
    ) -> Option<PairScore> {
        let mut best: Option<PairScore> = None;

        for &(existing_index, existing) in comparable {
            if !self.in_scope(candidate, existing) {
                continue;
            }
            let Some(score) = self.score_pair(candidate, existing, existing_index) else {
                continue;
            };
            if best.as_ref().map_or(true, |current| score.beats(current)) {
                best = Some(score);
            }
        }

        best
    }

    /// Records of different accounts are only compared when scoping is off
    fn in_scope(&self, candidate: &Transaction, existing: &Transaction) -> bool {
        if !self.options.scope_by_account {
            return true;
        }
        match (&candidate.account_id, &existing.account_id) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    fn score_pair(
        &self,
        candidate: &Transaction,
        existing: &Transaction,
        existing_index: usize,
    ) -> Option<PairScore> {
        let (cand_date, cand_amount) = (candidate.date?, candidate.amount?);
        let (exist_date, exist_amount) = (existing.date?, existing.amount?);

        let date_difference_days = (cand_date - exist_date).num_days().abs();
        let similarity = description_similarity(
            &candidate.description,
            &existing.description,
            self.options.description_metric,
        );

        let matches = FieldMatches {
            date: date_difference_days <= self.options.date_tolerance_days,
            amount: amounts_match(cand_amount, exist_amount, self.options.amount_tolerance),
            description: similarity >= self.options.description_similarity_threshold,
            category: categories_match(
                candidate.category.as_deref(),
                existing.category.as_deref(),
            ),
        };

        Some(PairScore {
            existing_index,
            confidence: self.confidence(&matches),
            matches,
            date_difference_days,
            description_similarity: similarity,
        })
    }

    /// Matched normalized weight over the total, summed in the same order so
    /// that a full match is exactly 1.0
    fn confidence(&self, matches: &FieldMatches) -> f64 {
        let w = &self.weights;
        let fields = [
            (matches.date, w.date),
            (matches.amount, w.amount),
            (matches.description, w.description),
            (matches.category, w.category),
        ];

        let total: f64 = fields.iter().map(|(_, weight)| weight).sum();
        let matched: f64 = fields
            .iter()
            .map(|(hit, weight)| if *hit { *weight } else { 0.0 })
            .sum();

        (matched / total).clamp(0.0, 1.0)
    }
}

/// Round to whole cents
fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Slack for comparing a cent difference with a scaled tolerance
const CENT_EPSILON: f64 = 1e-6;

/// Same sign and within tolerance; zero counts as non-negative.
///
/// Amounts are rounded to cents, the tolerance is not.
fn amounts_match(a: f64, b: f64, tolerance: f64) -> bool {
    let (a, b) = (to_cents(a), to_cents(b));
    if (a < 0) != (b < 0) {
        return false;
    }
    ((a - b).abs() as f64) <= tolerance * 100.0 + CENT_EPSILON
}

/// Both present, non-blank, and equal ignoring case and surrounding space
fn categories_match(a: Option<&str>, b: Option<&str>) -> bool {
    match (a.map(str::trim), b.map(str::trim)) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}
