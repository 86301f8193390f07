//! Console reports for the ledger, configuration and topic analyses
//!
//! These are the human-facing views printed by the `cache`, `config` and
//! `analyze` commands.

use crate::ai::TopicAnalysis;
use crate::config::Config;
use crate::ledger::{LedgerStats, VisitRecord};
use std::path::Path;

/// Percentage of successful visits, 0 for an empty ledger
pub fn success_rate(stats: &LedgerStats) -> f64 {
    if stats.total > 0 {
        (stats.successful as f64 / stats.total as f64) * 100.0
    } else {
        0.0
    }
}

/// Prints ledger statistics to stdout
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `path` - The ledger file they were read from
pub fn print_ledger_stats(stats: &LedgerStats, path: &Path) {
    println!("=== Visited URL Cache ===\n");

    println!("Cache file: {}", path.display());
    println!("  Total URLs: {}", stats.total);
    println!("  Successful: {}", stats.successful);
    println!("  Failed: {}", stats.failed);
    println!("  Emails found: {}", stats.total_emails);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} sites successfully scraped)",
        success_rate(stats),
        stats.successful,
        stats.total
    );
}

/// One line of the `cache list` output
pub fn format_visit_record(record: &VisitRecord) -> String {
    let mut line = format!(
        "{} [{}] {} emails, visited {} ({}x)",
        record.url,
        if record.success { "ok" } else { "failed" },
        record.email_count,
        record.visited_at.format("%Y-%m-%d %H:%M:%S"),
        record.visit_count
    );
    if let Some(error) = &record.error {
        line.push_str(&format!(" - {}", error));
    }
    line
}

/// Prints ledger records, one per line
pub fn print_visit_records(records: &[&VisitRecord]) {
    if records.is_empty() {
        println!("No URLs in cache.");
        return;
    }

    println!("Cached URLs ({}):", records.len());
    for record in records {
        println!("  {}", format_visit_record(record));
    }
}

/// Prints the effective configuration with the API key masked
pub fn print_config(config: &Config) {
    println!("=== Lead-Scout Configuration ===\n");

    println!("Google AI:");
    println!("  API key: {}", config.masked_api_key());
    println!(
        "  Project ID: {}",
        config.google.project_id.as_deref().unwrap_or("(not set)")
    );
    println!("  Model: {}", config.google.model);
    println!("  API base: {}", config.google.api_base);

    println!("\nScraping:");
    println!("  Max websites: {}", config.scraping.max_websites);
    println!("  Max emails per site: {}", config.scraping.max_emails_per_site);
    println!("  Max pages per site: {}", config.scraping.max_pages_per_site);
    println!("  Max depth: {}", config.scraping.max_depth);
    println!("  Timeout: {}s", config.scraping.timeout_seconds);
    println!("  Delay between requests: {}s", config.scraping.delay_between_requests);
    println!("  User agent: {}", config.scraping.user_agent);

    println!("\nSearch:");
    println!("  Country: {}", config.search.country);
    println!("  Language: {}", config.search.language);

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    println!("  Directory: {}", config.output.dir.display());
    println!("  Min confidence: {}", config.output.min_confidence);
    println!("  Dedup by: {}", config.output.dedup_by);
    if !config.output.allowed_domains.is_empty() {
        println!("  Allowed domains: {}", config.output.allowed_domains.join(", "));
    }

    println!("\nCache file: {}", config.cache.file.display());
    println!("Log level: {}", config.logging.level);
}

/// Prints a topic analysis
pub fn print_topic_analysis(topic: &str, analysis: &TopicAnalysis) {
    println!("=== Topic Analysis: {} ===\n", topic);

    println!("Summary: {}", analysis.topic_summary);
    println!("Industry: {}", analysis.industry);
    print_list("Key categories", &analysis.key_categories);
    print_list("Search keywords", &analysis.search_keywords);
    print_list("Typical domains", &analysis.typical_domains);
}

/// Prints a titled bullet list, nothing if it is empty
pub fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{} ({}):", label, items.len());
    for item in items {
        println!("  - {}", item);
    }
}
