//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sift - Catch duplicate transactions before they are imported
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Duplicate transaction detector for statement imports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Matcher config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a new statement against existing transactions
    Check {
        /// Newly imported transactions (CSV or .json)
        #[arg(short, long)]
        candidates: PathBuf,

        /// Previously stored transactions (CSV or .json)
        #[arg(short, long)]
        existing: PathBuf,

        /// Override: days apart still counted as the same date
        #[arg(long)]
        date_tolerance: Option<i64>,

        /// Override: amount difference still counted as the same amount
        #[arg(long)]
        amount_tolerance: Option<f64>,

        /// Override: minimum description similarity (0-1)
        #[arg(long)]
        similarity: Option<f64>,

        /// Override: minimum confidence to flag a duplicate (0-1)
        #[arg(long)]
        threshold: Option<f64>,

        /// Compare records across different accounts
        #[arg(long)]
        ignore_accounts: bool,

        /// Override: description metric (levenshtein, token_set)
        #[arg(long)]
        metric: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the non-duplicate candidates to this CSV file
        #[arg(long)]
        write_new: Option<PathBuf>,

        /// Include rows skipped for missing data in --write-new output
        #[arg(long)]
        include_skipped: bool,
    },

    /// Inspect matcher configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the user override path
    Path,
}
