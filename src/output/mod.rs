//! Output module for run summaries and console reports
//!
//! This module handles:
//! - Printing ledger statistics, cached URLs and the effective configuration
//! - Printing topic analyses
//! - Generating markdown summaries of runs

mod markdown;
pub mod stats;

pub use markdown::{
    format_markdown_summary, generate_markdown_summary, print_run_summary, status_label,
};
pub use stats::{
    print_config, print_ledger_stats, print_list, print_topic_analysis, print_visit_records,
    success_rate,
};

use crate::collector::OutputFormat;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Longest topic prefix used in generated file names
const MAX_SLUG_LENGTH: usize = 30;

/// Turns a topic into a file-name friendly slug
///
/// Lowercases, keeps ASCII letters and digits, maps whitespace and dashes to
/// `_` and truncates to 30 characters.
pub fn topic_slug(topic: &str) -> String {
    let mut slug = String::new();
    for c in topic.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('_') {
            slug.push('_');
        }
    }

    let slug: String = slug.trim_matches('_').chars().take(MAX_SLUG_LENGTH).collect();
    if slug.is_empty() {
        "emails".to_string()
    } else {
        slug.trim_end_matches('_').to_string()
    }
}

/// Default output path: `{dir}/{topic_slug}_{YYYYmmdd_HHMMSS}.{ext}`
pub fn default_output_path(
    dir: &Path,
    topic: &str,
    format: OutputFormat,
    at: DateTime<Utc>,
) -> PathBuf {
    dir.join(format!(
        "{}_{}.{}",
        topic_slug(topic),
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}
