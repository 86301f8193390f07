//! Ledger traits and error types
//!
//! This module defines the trait interface for visited-URL ledgers and the
//! associated error types.

use crate::ledger::{LedgerStats, VisitRecord};
use chrono::Duration;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ledger file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Trait for visited-URL ledger implementations
///
/// All URL arguments are normalized before lookup, so
/// `https://Example.com/about/` and `https://example.com/about` refer to the
/// same record. Mutating operations persist immediately.
pub trait Ledger {
    /// Returns true iff a record exists for the normalized URL
    fn is_visited(&self, url: &str) -> bool;

    /// Returns the record for the normalized URL, if any
    fn get(&self, url: &str) -> Option<&VisitRecord>;

    /// Inserts or overwrites the record for a URL with the current timestamp
    ///
    /// A re-visit keeps `first_visited` and increments `visit_count`; all
    /// other fields are replaced.
    ///
    /// # Arguments
    ///
    /// * `url` - The visited URL
    /// * `success` - Whether the scrape succeeded
    /// * `email_count` - Number of emails found
    /// * `error` - Failure description for unsuccessful visits
    fn mark_visited(
        &mut self,
        url: &str,
        success: bool,
        email_count: u32,
        error: Option<&str>,
    ) -> LedgerResult<()>;

    /// Deletes the record for a URL
    ///
    /// Returns true if a record was removed, false if none existed.
    fn remove(&mut self, url: &str) -> LedgerResult<bool>;

    /// Deletes all records
    fn clear(&mut self) -> LedgerResult<()>;

    /// Removes every record last visited at or before `now - max_age`
    ///
    /// Returns the number of records removed.
    fn cleanup(&mut self, max_age: Duration) -> LedgerResult<usize>;

    /// Aggregate counts over all records
    fn stats(&self) -> LedgerStats;

    /// All records, ordered by URL
    fn records(&self) -> Vec<&VisitRecord>;

    /// Returns the URLs that have no record, preserving input order
    fn filter_unvisited(&self, urls: &[String]) -> Vec<String> {
        urls.iter()
            .filter(|url| !self.is_visited(url))
            .cloned()
            .collect()
    }

    /// URLs whose latest visit succeeded
    fn successful_urls(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.success)
            .map(|r| r.url.clone())
            .collect()
    }

    /// URLs whose latest visit failed
    fn failed_urls(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| !r.success)
            .map(|r| r.url.clone())
            .collect()
    }
}
