//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a run,
//! including the topic analysis, per-site outcomes and collected emails.

use crate::collector::EmailCollector;
use crate::crawler::{RunReport, SiteStatus};
use std::fs;
use std::io;
use std::path::Path;

/// Emails listed in the summary before it is cut short
const MAX_LISTED_EMAILS: usize = 50;

/// Emails shown on the console after a run
const SAMPLE_EMAILS: usize = 10;

/// Writes a markdown summary of a run
///
/// # Arguments
///
/// * `report` - The finished run
/// * `collector` - The emails collected during the run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(io::Error)` - Failed to write summary
pub fn generate_markdown_summary(
    report: &RunReport,
    collector: &EmailCollector,
    output_path: &Path,
) -> io::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(output_path, format_markdown_summary(report, collector))
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(report: &RunReport, collector: &EmailCollector) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Lead-Scout Run: {}\n\n", report.topic));

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        report.duration.as_secs_f64()
    ));
    md.push_str(&format!("- **Industry**: {}\n", report.analysis.industry));
    if !report.analysis.topic_summary.is_empty() {
        md.push_str(&format!("- **Summary**: {}\n", report.analysis.topic_summary));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Candidates**: {}\n", report.candidates.len()));
    md.push_str(&format!("- **Sites Scraped**: {}\n", report.sites_scraped()));
    md.push_str(&format!("- **Sites Failed**: {}\n", report.sites_failed()));
    md.push_str(&format!("- **Sites Skipped**: {}\n", report.sites_skipped()));
    md.push_str(&format!("- **Pages Crawled**: {}\n", report.pages_crawled()));
    md.push_str(&format!(
        "- **Emails Collected**: {}\n\n",
        report.emails_collected
    ));

    // Site breakdown
    if !report.sites.is_empty() {
        md.push_str("## Websites\n\n");
        md.push_str("| URL | Status | Pages | Emails | Error |\n");
        md.push_str("|-----|--------|-------|--------|-------|\n");

        for site in &report.sites {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                site.url,
                status_label(site.status),
                site.pages_crawled,
                site.emails_found,
                site.error.as_deref().unwrap_or("")
            ));
        }
        md.push('\n');
    }

    // Collected emails
    let records = collector.records();
    if !records.is_empty() {
        md.push_str("## Top Emails\n\n");
        md.push_str("| Email | Confidence | Source |\n");
        md.push_str("|-------|------------|--------|\n");

        for record in records.iter().take(MAX_LISTED_EMAILS) {
            md.push_str(&format!(
                "| {} | {:.2} | {} |\n",
                record.email, record.confidence, record.source_url
            ));
        }
        if records.len() > MAX_LISTED_EMAILS {
            md.push_str(&format!(
                "\n... and {} more\n",
                records.len() - MAX_LISTED_EMAILS
            ));
        }
        md.push('\n');
    }

    md
}

/// Short label for a site status
pub fn status_label(status: SiteStatus) -> &'static str {
    match status {
        SiteStatus::Scraped => "scraped",
        SiteStatus::Failed => "failed",
        SiteStatus::SkippedVisited => "cached",
        SiteStatus::Duplicate => "duplicate",
        SiteStatus::InvalidUrl => "invalid URL",
    }
}

/// Prints a short run summary and a sample of the best emails to stdout
pub fn print_run_summary(report: &RunReport, collector: &EmailCollector, output_path: &Path) {
    println!("\n=== Run Summary: {} ===\n", report.topic);
    println!("  Candidates: {}", report.candidates.len());
    println!("  Sites scraped: {}", report.sites_scraped());
    println!("  Sites failed: {}", report.sites_failed());
    println!("  Sites skipped: {}", report.sites_skipped());
    println!("  Pages crawled: {}", report.pages_crawled());
    println!("  Emails collected: {}", report.emails_collected);
    println!("  Unique addresses: {}", collector.unique_emails());
    println!("  Duration: {:.1}s", report.duration.as_secs_f64());

    let records = collector.records();
    if records.is_empty() {
        println!("\nNo emails found");
    } else {
        let shown = records.len().min(SAMPLE_EMAILS);
        println!("\nSample emails ({} of {}):", shown, records.len());
        for record in records.iter().take(shown) {
            println!(
                "  {:.2}  {}  ({})",
                record.confidence, record.email, record.source_url
            );
        }
    }

    println!("\n✓ Results written to: {}", output_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{TopicAnalysis, WebsiteCandidate};
    use crate::crawler::SiteOutcome;
    use chrono::Utc;
    use std::time::Duration;

    fn create_test_report() -> RunReport {
        RunReport {
            topic: "bakeries".to_string(),
            analysis: TopicAnalysis::fallback("bakeries"),
            candidates: vec![WebsiteCandidate {
                url: "https://bread.org".to_string(),
                relevance_score: 0.9,
                description: String::new(),
                category: String::new(),
            }],
            sites: vec![
                SiteOutcome {
                    url: "https://bread.org/".to_string(),
                    status: SiteStatus::Scraped,
                    pages_crawled: 4,
                    emails_found: 2,
                    emails_added: 2,
                    error: None,
                },
                SiteOutcome {
                    url: "https://stale.org/".to_string(),
                    status: SiteStatus::Failed,
                    pages_crawled: 0,
                    emails_found: 0,
                    emails_added: 0,
                    error: Some("HTTP 503".to_string()),
                },
            ],
            emails_collected: 2,
            started_at: Utc::now(),
            duration: Duration::from_secs(12),
        }
    }

    #[test]
    fn test_format_markdown_summary() {
        let report = create_test_report();
        let markdown = format_markdown_summary(&report, &EmailCollector::default());

        assert!(markdown.contains("# Lead-Scout Run: bakeries"));
        assert!(markdown.contains("- **Sites Scraped**: 1"));
        assert!(markdown.contains("- **Sites Failed**: 1"));
        assert!(markdown.contains("| https://stale.org/ | failed | 0 | 0 | HTTP 503 |"));
        assert!(!markdown.contains("Top Emails"));
    }

    #[test]
    fn test_markdown_lists_emails() {
        let report = create_test_report();
        let mut collector = EmailCollector::default();
        collector
            .add("owner@bread.org", "https://bread.org/", 0.9)
            .unwrap();

        let markdown = format_markdown_summary(&report, &collector);
        assert!(markdown.contains("| owner@bread.org | 0.90 | https://bread.org/ |"));
    }

    #[test]
    fn test_generate_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.md");

        generate_markdown_summary(&create_test_report(), &EmailCollector::default(), &path)
            .unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("# Lead-Scout Run"));
    }
}
