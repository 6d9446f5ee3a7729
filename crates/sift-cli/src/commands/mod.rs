//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `check` - Duplicate check of a candidate file against existing records
//! - `options` - Config commands and shared option resolution

pub mod check;
pub mod options;

// Re-export command functions for main.rs
pub use check::*;
pub use options::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
