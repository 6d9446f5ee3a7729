//! Sift CLI - Duplicate transaction detector
//!
//! Usage:
//!   sift check --candidates new.csv --existing stored.csv
//!   sift check -c new.csv -e stored.json --format json
//!   sift config show

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Check {
            candidates,
            existing,
            date_tolerance,
            amount_tolerance,
            similarity,
            threshold,
            ignore_accounts,
            metric,
            format,
            write_new,
            include_skipped,
        } => {
            let overrides = commands::OptionOverrides {
                date_tolerance_days: date_tolerance,
                amount_tolerance,
                description_similarity_threshold: similarity,
                confidence_threshold: threshold,
                ignore_accounts,
                metric,
            };
            let options = commands::resolve_options(cli.config.as_deref(), &overrides)?;
            commands::cmd_check(
                &options,
                &candidates,
                &existing,
                &format,
                write_new.as_deref(),
                include_skipped,
            )
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::cmd_config_show(cli.config.as_deref()),
            ConfigAction::Path => commands::cmd_config_path(),
        },
    }
}
