//! Integration tests for sift-core
//!
//! These tests exercise the full load → match → export workflow and the
//! batch-level properties of the matcher.

use chrono::NaiveDate;
use sift_core::{
    export::non_duplicates_csv,
    find_duplicates,
    import::parse_csv,
    DuplicateMatcher, MatchOptions, Transaction,
};

fn tx(d: &str, desc: &str, amount: f64) -> Transaction {
    Transaction::new(
        NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
        desc,
        amount,
    )
}

/// Statement exported last month, already imported
fn existing_csv() -> &'static str {
    r#"Transaction Date,Post Date,Description,Category,Type,Amount,Memo
01/02/2024,01/03/2024,NETFLIX.COM,Entertainment,Sale,-15.49,
01/05/2024,01/06/2024,WHOLE FOODS MARKET #10234,Groceries,Sale,-84.12,
01/09/2024,01/10/2024,SHELL OIL 5744,Gas,Sale,-41.07,
01/12/2024,01/13/2024,PAYROLL ACME CORP,Income,Credit,2500.00,
01/14/2024,01/15/2024,SQ *BLUE BOTTLE COFFEE,Food & Drink,Sale,-6.25,"#
}

/// Overlapping statement: first rows repeat, posted a day later, rest is new
fn candidate_csv() -> &'static str {
    r#"Date,Description,Amount,Category
2024-01-10,SHELL OIL 5744,-41.07,Gas
2024-01-12,PAYROLL ACME CORP,2500.00,Income
2024-01-15,BLUE BOTTLE COFFEE,-6.25,Food & Drink
2024-01-16,TRADER JOE'S #552,-37.80,Groceries
2024-02-02,NETFLIX.COM,-15.49,Entertainment
,MISSING DATE ROW,-3.00,"#
}

fn all_candidates() -> Vec<Transaction> {
    vec![
        tx("2024-01-15", "Coffee Shop", -5.50).with_category("Food"),
        tx("2024-01-15", "Coffee Shop", 5.50),
        tx("2024-01-16", "COFFEE SHOP", -5.50),
        tx("2024-01-18", "Coffee Shop", -5.50),
        tx("2024-01-15", "Gas Station", -40.00).with_category("Gas"),
        tx("2024-01-20", "Bookstore", -12.99),
    ]
}

fn all_existing() -> Vec<Transaction> {
    vec![
        tx("2024-01-15", "Coffee Shop", -5.50).with_category("Food"),
        tx("2024-01-14", "Gas Station", -40.00),
        tx("2024-01-15", "Gas Station", -40.00).with_category("Gas"),
        tx("2023-12-20", "Bookstore", -12.99),
    ]
}

// =============================================================================
// Workflow
// =============================================================================

#[test]
fn test_overlapping_statement_workflow() {
    let existing = parse_csv(existing_csv().as_bytes()).unwrap();
    let candidates = parse_csv(candidate_csv().as_bytes()).unwrap();
    assert_eq!(existing.len(), 5);
    assert_eq!(candidates.len(), 6);

    let report = find_duplicates(&candidates, &existing, &MatchOptions::default()).unwrap();

    // Shell (posted a day later), payroll and Blue Bottle (wallet prefix) repeat
    let dup_indices: Vec<usize> = report.duplicates.iter().map(|d| d.candidate_index).collect();
    assert_eq!(dup_indices, vec![0, 1, 2]);
    assert_eq!(report.duplicates[0].existing_index, 2);
    assert_eq!(report.duplicates[1].existing_index, 3);
    assert_eq!(report.duplicates[2].existing_index, 4);

    // Trader Joe's is new; next month's Netflix is a new charge; one row unusable
    let new_indices: Vec<usize> = report
        .non_duplicates
        .iter()
        .map(|n| n.candidate_index)
        .collect();
    assert_eq!(new_indices, vec![3, 4, 5]);
    assert!(!report.non_duplicates[2].evaluated);
    assert_eq!(report.warnings.len(), 1);

    assert_eq!(report.summary.total, 6);
    assert_eq!(report.summary.duplicates, 3);
    assert_eq!(report.summary.non_duplicates, 3);
    assert_eq!(report.summary.skipped, 1);
    assert!((report.summary.duplicate_percentage - 50.0).abs() < 1e-9);

    let clean = non_duplicates_csv(&report, false).unwrap();
    let reimported = parse_csv(clean.as_bytes()).unwrap();
    assert_eq!(reimported.len(), 2);
    assert_eq!(reimported[0].description, "TRADER JOE'S #552");
}

// =============================================================================
// Batch properties
// =============================================================================

#[test]
fn test_partition_completeness() {
    let candidates = all_candidates();
    let report = find_duplicates(&candidates, &all_existing(), &MatchOptions::default()).unwrap();

    assert_eq!(
        report.duplicates.len() + report.non_duplicates.len(),
        candidates.len()
    );

    let mut seen: Vec<usize> = report
        .duplicates
        .iter()
        .map(|d| d.candidate_index)
        .chain(report.non_duplicates.iter().map(|n| n.candidate_index))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..candidates.len()).collect::<Vec<_>>());
}

#[test]
fn test_output_order_is_stable() {
    let report =
        find_duplicates(&all_candidates(), &all_existing(), &MatchOptions::default()).unwrap();

    let dup: Vec<usize> = report.duplicates.iter().map(|d| d.candidate_index).collect();
    let non: Vec<usize> = report
        .non_duplicates
        .iter()
        .map(|n| n.candidate_index)
        .collect();
    assert!(dup.windows(2).all(|w| w[0] < w[1]));
    assert!(non.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_determinism() {
    let options = MatchOptions::default();
    let first = find_duplicates(&all_candidates(), &all_existing(), &options).unwrap();
    let second = find_duplicates(&all_candidates(), &all_existing(), &options).unwrap();
    assert_eq!(first, second);

    let matcher = DuplicateMatcher::new(options).unwrap();
    let third = matcher.find_duplicates(&all_candidates(), &all_existing());
    assert_eq!(first, third);
}

#[test]
fn test_inputs_not_mutated() {
    let candidates = all_candidates();
    let existing = all_existing();
    let _ = find_duplicates(&candidates, &existing, &MatchOptions::default()).unwrap();
    assert_eq!(candidates, all_candidates());
    assert_eq!(existing, all_existing());
}

#[test]
fn test_threshold_monotonicity() {
    let candidates = all_candidates();
    let existing = all_existing();

    let mut previous: Option<Vec<usize>> = None;
    for step in 0..=20 {
        let threshold = step as f64 / 20.0;
        let options = MatchOptions {
            confidence_threshold: threshold,
            ..Default::default()
        };
        let report = find_duplicates(&candidates, &existing, &options).unwrap();

        for dup in &report.duplicates {
            assert!(dup.confidence >= threshold);
        }

        let dups: Vec<usize> = report.duplicates.iter().map(|d| d.candidate_index).collect();
        if let Some(prev) = &previous {
            // Raising the threshold can only remove duplicates
            assert!(dups.iter().all(|i| prev.contains(i)));
        }
        previous = Some(dups);
    }
}

#[test]
fn test_empty_candidates() {
    let report = find_duplicates(&[], &all_existing(), &MatchOptions::default()).unwrap();
    assert!(report.duplicates.is_empty());
    assert!(report.non_duplicates.is_empty());
    assert_eq!(report.summary.total, 0);
    assert_eq!(report.summary.duplicates, 0);
    assert_eq!(report.summary.non_duplicates, 0);
    assert_eq!(report.summary.duplicate_percentage, 0.0);
}

#[test]
fn test_empty_existing() {
    let candidates = all_candidates();
    let report = find_duplicates(&candidates, &[], &MatchOptions::default()).unwrap();
    assert!(report.duplicates.is_empty());
    assert_eq!(report.non_duplicates.len(), candidates.len());
    assert!(report.non_duplicates.iter().all(|n| n.evaluated));
    assert!(report.non_duplicates.iter().all(|n| n.best_confidence.is_none()));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_exact_match_scenario() {
    let candidate = tx("2024-01-15", "Coffee Shop", -5.50).with_category("Food");
    let existing = vec![
        tx("2024-01-10", "Bakery", -3.00),
        tx("2024-01-15", "Coffee Shop", -5.50).with_category("Food"),
    ];

    let report = find_duplicates(&[candidate], &existing, &MatchOptions::default()).unwrap();
    let dup = &report.duplicates[0];
    assert_eq!(dup.existing_index, 1);
    assert!(dup.confidence > 0.999);
    assert!(dup.matches.date && dup.matches.amount);
    assert!(dup.matches.description && dup.matches.category);
}

#[test]
fn test_amount_sign_scenario() {
    let candidate = tx("2024-01-15", "Coffee Shop", -5.50);
    let existing = vec![tx("2024-01-15", "Coffee Shop", 5.50)];

    let report = find_duplicates(&[candidate], &existing, &MatchOptions::default()).unwrap();
    assert!(report.duplicates.is_empty());
    assert_eq!(report.non_duplicates.len(), 1);
}

#[test]
fn test_date_tolerance_scenario() {
    let options = MatchOptions {
        date_tolerance_days: 1,
        ..Default::default()
    };
    let existing = vec![tx("2024-01-15", "Coffee Shop", -5.50)];

    let near = find_duplicates(&[tx("2024-01-16", "Coffee Shop", -5.50)], &existing, &options)
        .unwrap();
    assert_eq!(near.duplicates.len(), 1);
    assert!(near.duplicates[0].matches.date);

    let far = find_duplicates(&[tx("2024-01-18", "Coffee Shop", -5.50)], &existing, &options)
        .unwrap();
    assert!(far.duplicates.is_empty());
}

#[test]
fn test_best_match_scenario() {
    // Second record has the higher confidence and must win over the first
    let candidate = tx("2024-01-15", "Gas Station", -40.00).with_category("Gas");
    let report =
        find_duplicates(&[candidate], &all_existing(), &MatchOptions::default()).unwrap();
    assert_eq!(report.duplicates[0].existing_index, 2);
    assert!(report.duplicates[0].matches.category);
}

#[test]
fn test_token_set_metric() {
    let options = MatchOptions {
        description_metric: sift_core::SimilarityMetric::TokenSet,
        ..Default::default()
    };
    let candidate = tx("2024-01-15", "MARKET WHOLE FOODS", -84.12);
    let existing = vec![tx("2024-01-15", "WHOLE FOODS MARKET", -84.12)];

    let report = find_duplicates(&[candidate.clone()], &existing, &options).unwrap();
    assert_eq!(report.duplicates.len(), 1);

    // Reordered words are far apart by edit distance
    let report = find_duplicates(&[candidate], &existing, &MatchOptions::default()).unwrap();
    assert!(report.duplicates.is_empty());
}
