//! Sift Core Library
//!
//! Duplicate transaction detection for personal finance imports:
//! - Transaction records and match reports
//! - Configurable fuzzy matcher with confidence scoring
//! - Description normalization and similarity metrics
//! - CSV/JSON loaders for candidate and existing transactions
//! - Report export (JSON, de-duplicated CSV)
//!
//! The matcher is a pure function of its inputs: no I/O, no shared state.

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod matcher;
pub mod models;
pub mod similarity;

pub use config::{FieldWeights, MatchOptions};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use matcher::{find_duplicates, DuplicateMatcher};
pub use models::{
    DuplicateMatch, DuplicateReport, FieldMatches, MatchSummary, NonDuplicate, RecordSide,
    RecordWarning, RequiredField, Transaction,
};
pub use similarity::SimilarityMetric;
