//! Email collector
//!
//! The collector holds the deduplicated email records found during one run
//! and writes them out as CSV or JSON when the run completes.
//!
//! Duplicate policy: when the same key is added twice, the record with the
//! higher confidence is kept; on equal confidence the first-seen record wins.

mod export;
mod format;

pub use format::{DedupKey, OutputFormat};

use crate::config::OutputConfig;
use crate::extract::{is_valid_email, ExtractedEmail};
use crate::url::{canonical_key, matches_any};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while collecting or exporting emails
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Confidence {0} is outside [0, 1]")]
    InvalidConfidence(f64),

    #[error("Confidence {confidence:.2} for {email} is below the minimum {minimum:.2}")]
    BelowThreshold {
        email: String,
        confidence: f64,
        minimum: f64,
    },

    #[error("Email domain is not in the allow-list: {0}")]
    DomainNotAllowed(String),

    #[error("Unsupported output format '{0}' (expected csv or json)")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for collector operations
pub type CollectResult<T> = Result<T, CollectError>;

/// A collected email address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Lowercased, validated address
    pub email: String,

    /// Page the address was found on
    pub source_url: String,

    /// When the address was found
    pub found_at: DateTime<Utc>,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Text surrounding the address, when captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Run description written into the JSON metadata block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub topic: String,
    pub total_websites: usize,
    pub total_emails: usize,
    pub run_date: DateTime<Utc>,
}

/// What [`EmailCollector::add`] did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The key was new
    Inserted,

    /// The key existed with a lower confidence and was replaced
    Replaced,

    /// The key existed with an equal or higher confidence; nothing changed
    Duplicate,
}

type RecordKey = (String, Option<String>);

/// Deduplicated set of email records for one run
#[derive(Debug, Clone, Default)]
pub struct EmailCollector {
    records: HashMap<RecordKey, EmailRecord>,
    dedup_by: DedupKey,
    min_confidence: Option<f64>,
    allowed_domains: Vec<String>,
    topic: Option<String>,
    total_websites: usize,
    run_date: Option<DateTime<Utc>>,
}

impl EmailCollector {
    /// Creates an empty collector with no threshold or allow-list
    pub fn new(dedup_by: DedupKey) -> Self {
        Self {
            dedup_by,
            ..Default::default()
        }
    }

    /// Creates a collector from the output settings
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.dedup_by)
            .with_min_confidence(config.min_confidence)
            .with_allowed_domains(config.allowed_domains.clone())
    }

    /// Rejects records scored below `min_confidence`
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    /// Accepts only addresses whose domain matches one of the patterns
    ///
    /// An empty list accepts every domain.
    pub fn with_allowed_domains(mut self, patterns: Vec<String>) -> Self {
        self.allowed_domains = patterns;
        self
    }

    /// Sets the values written to the JSON metadata block
    pub fn describe_run(&mut self, topic: &str, total_websites: usize, run_date: DateTime<Utc>) {
        self.topic = Some(topic.to_string());
        self.total_websites = total_websites;
        self.run_date = Some(run_date);
    }

    /// Adds an address found on `source_url`
    ///
    /// The address is trimmed and lowercased before validation.
    ///
    /// # Errors
    ///
    /// * `InvalidFormat` - The address does not match the address pattern
    /// * `InvalidConfidence` - `confidence` is NaN or outside [0, 1]
    /// * `BelowThreshold` - `confidence` is below the configured minimum
    /// * `DomainNotAllowed` - The address domain is not in the allow-list
    pub fn add(
        &mut self,
        email: &str,
        source_url: &str,
        confidence: f64,
    ) -> CollectResult<AddOutcome> {
        self.insert(EmailRecord {
            email: email.to_string(),
            source_url: source_url.to_string(),
            found_at: Utc::now(),
            confidence,
            context: None,
        })
    }

    /// Adds an extractor result, keeping its timestamp and context
    pub fn add_extracted(&mut self, extracted: ExtractedEmail) -> CollectResult<AddOutcome> {
        self.insert(EmailRecord {
            email: extracted.email,
            source_url: extracted.source_url,
            found_at: extracted.found_at,
            confidence: extracted.confidence,
            context: extracted.context,
        })
    }

    /// Validates a record and applies the duplicate policy
    pub fn insert(&mut self, mut record: EmailRecord) -> CollectResult<AddOutcome> {
        record.email = record.email.trim().to_lowercase();

        if !is_valid_email(&record.email) {
            return Err(CollectError::InvalidFormat(record.email));
        }

        if !(0.0..=1.0).contains(&record.confidence) {
            return Err(CollectError::InvalidConfidence(record.confidence));
        }

        if let Some(minimum) = self.min_confidence {
            if record.confidence < minimum {
                return Err(CollectError::BelowThreshold {
                    email: record.email,
                    confidence: record.confidence,
                    minimum,
                });
            }
        }

        if !self.allowed_domains.is_empty() {
            let domain = record
                .email
                .rsplit_once('@')
                .map(|(_, domain)| domain)
                .unwrap_or_default();
            if !matches_any(&self.allowed_domains, domain) {
                return Err(CollectError::DomainNotAllowed(record.email));
            }
        }

        let key = self.key_for(&record);
        match self.records.get_mut(&key) {
            None => {
                tracing::trace!("Collected {} from {}", record.email, record.source_url);
                self.records.insert(key, record);
                Ok(AddOutcome::Inserted)
            }
            Some(existing) if record.confidence > existing.confidence => {
                tracing::trace!(
                    "Replacing {} ({:.2} -> {:.2})",
                    record.email,
                    existing.confidence,
                    record.confidence
                );
                *existing = record;
                Ok(AddOutcome::Replaced)
            }
            Some(_) => Ok(AddOutcome::Duplicate),
        }
    }

    fn key_for(&self, record: &EmailRecord) -> RecordKey {
        match self.dedup_by {
            DedupKey::Email => (record.email.clone(), None),
            DedupKey::EmailAndSource => {
                (record.email.clone(), Some(canonical_key(&record.source_url)))
            }
        }
    }

    /// All records, by descending confidence then address then source
    pub fn records(&self) -> Vec<&EmailRecord> {
        let mut records: Vec<&EmailRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.email.cmp(&b.email))
                .then_with(|| a.source_url.cmp(&b.source_url))
        });
        records
    }

    /// Distinct addresses, regardless of the dedup key
    pub fn unique_emails(&self) -> usize {
        let mut emails: Vec<&str> = self.records.values().map(|r| r.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        emails.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Metadata for the JSON export, stamped with `now` if no run was described
    pub fn metadata(&self, now: DateTime<Utc>) -> RunMetadata {
        RunMetadata {
            topic: self.topic.clone().unwrap_or_default(),
            total_websites: self.total_websites,
            total_emails: self.records.len(),
            run_date: self.run_date.unwrap_or(now),
        }
    }

    /// Writes every record to `path` in the given format
    ///
    /// Returns the number of records written. The parent directory is
    /// created if needed.
    pub fn export(&self, format: OutputFormat, path: &Path) -> CollectResult<usize> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let now = Utc::now();
        let records = self.records();
        match format {
            OutputFormat::Csv => export::write_csv(path, &records, now)?,
            OutputFormat::Json => export::write_json(path, &records, self.metadata(now))?,
        }

        tracing::info!("Saved {} emails to {}", records.len(), path.display());
        Ok(records.len())
    }

    /// Reads a file written by [`export`](Self::export) and adds its records
    ///
    /// The format is taken from the file extension. Records rejected by the
    /// current threshold or allow-list are skipped. Returns the number of
    /// records inserted or replaced.
    pub fn merge_file(&mut self, path: &Path) -> CollectResult<usize> {
        let format = OutputFormat::from_path(path)?;
        let records = match format {
            OutputFormat::Csv => export::read_csv(path)?,
            OutputFormat::Json => export::read_json(path)?,
        };

        let mut merged = 0;
        for record in records {
            match self.insert(record) {
                Ok(AddOutcome::Inserted) | Ok(AddOutcome::Replaced) => merged += 1,
                Ok(AddOutcome::Duplicate) => {}
                Err(e) => tracing::debug!("Skipping merged record: {}", e),
            }
        }

        tracing::info!("Merged {} emails from {}", merged, path.display());
        Ok(merged)
    }
}
