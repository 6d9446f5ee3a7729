//! Description similarity scoring
//!
//! Bank descriptions for the same purchase drift between statement formats:
//! wallet prefixes come and go ("AplPay", "SQ *"), casing changes, and
//! separators like `*` and `#` appear around store numbers. Descriptions are
//! normalized first, then scored in [0, 1] with one of two metrics:
//!
//! - `levenshtein`: `1 - edit_distance / longer_length` over characters
//! - `token_set`: Jaccard overlap of the word sets

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Wallet and card-processor prefixes that vary per transaction
fn payment_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:APLPAY|APPLEPAY|APPLE PAY|GOOGLE PAY|GPAY|SQ ?\*|TST ?\*|SP ?\*|PP ?\*|PAYPAL ?\*)\s*",
        )
        .expect("valid regex")
    })
}

/// Similarity metric for descriptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Levenshtein,
    TokenSet,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Levenshtein => "levenshtein",
            Self::TokenSet => "token_set",
        }
    }
}

impl std::fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "levenshtein" => Ok(Self::Levenshtein),
            "token_set" | "token-set" | "tokens" => Ok(Self::TokenSet),
            _ => Err(format!("Unknown similarity metric: {}", s)),
        }
    }
}

/// Normalize a description for comparison.
///
/// Uppercases, treats `*` and `#` as separators, strips one leading wallet or
/// processor prefix, and collapses whitespace.
pub fn normalize_description(description: &str) -> String {
    let upper = description.trim().to_uppercase();
    let stripped = payment_prefix_re().replace(&upper, "");

    stripped
        .replace(['*', '#'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Score two descriptions in [0, 1] after normalization
pub fn description_similarity(a: &str, b: &str, metric: SimilarityMetric) -> f64 {
    let a = normalize_description(a);
    let b = normalize_description(b);

    if a == b {
        return 1.0;
    }

    match metric {
        SimilarityMetric::Levenshtein => levenshtein_ratio(&a, &b),
        SimilarityMetric::TokenSet => token_set_ratio(&a, &b),
    }
}

fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 1.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// Character-level edit distance (insert, delete, substitute)
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
