//! Visited-URL ledger
//!
//! This module tracks which websites have already been scraped so repeated
//! runs skip them. The ledger is:
//! - keyed by normalized URL (one record per URL)
//! - persisted as a single JSON object mapping URL to visit metadata
//! - rewritten in full after every change

mod export;
mod json;
mod traits;

pub use export::export_ledger_csv;
pub use json::JsonLedger;
pub use traits::{Ledger, LedgerError, LedgerResult};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Visit metadata for one normalized URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Normalized URL (the record key)
    pub url: String,

    /// When the URL was first visited
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub first_visited: DateTime<Utc>,

    /// When the URL was most recently visited
    #[serde(alias = "last_visited", deserialize_with = "deserialize_timestamp")]
    pub visited_at: DateTime<Utc>,

    /// Number of recorded visits
    #[serde(default = "default_visit_count")]
    pub visit_count: u32,

    /// Whether the latest visit succeeded
    pub success: bool,

    /// Emails found on the latest visit
    #[serde(alias = "emails_found", default)]
    pub email_count: u32,

    /// Failure description for the latest visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VisitRecord {
    /// Creates a record for a first visit
    pub fn new(
        url: String,
        at: DateTime<Utc>,
        success: bool,
        email_count: u32,
        error: Option<String>,
    ) -> Self {
        Self {
            url,
            first_visited: at,
            visited_at: at,
            visit_count: 1,
            success,
            email_count,
            error,
        }
    }

    /// Applies a re-visit, keeping `first_visited`
    pub fn revisit(
        &mut self,
        at: DateTime<Utc>,
        success: bool,
        email_count: u32,
        error: Option<String>,
    ) {
        self.visited_at = at;
        self.visit_count = self.visit_count.saturating_add(1);
        self.success = success;
        self.email_count = email_count;
        self.error = error;
    }
}

/// Aggregate ledger counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_emails: u64,
}

impl LedgerStats {
    /// Computes counts over a set of records
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a VisitRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            if record.success {
                stats.successful += 1;
            } else {
                stats.failed += 1;
            }
            stats.total_emails += u64::from(record.email_count);
        }
        stats
    }
}

fn default_visit_count() -> u32 {
    1
}

/// Accepts RFC 3339 timestamps and, for older ledger files, naive ISO-8601
/// timestamps which are read as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}
