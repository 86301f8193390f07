//! JSON-file ledger implementation
//!
//! This module provides a file-backed implementation of the Ledger trait.

use crate::ledger::traits::{Ledger, LedgerError, LedgerResult};
use crate::ledger::{LedgerStats, VisitRecord};
use crate::url::canonical_key;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Ledger persisted as one JSON object mapping URL to [`VisitRecord`]
pub struct JsonLedger {
    path: Option<PathBuf>,
    records: BTreeMap<String, VisitRecord>,
}

impl JsonLedger {
    /// Opens the ledger file at `path`, creating its parent directory
    ///
    /// # Returns
    ///
    /// * `Ok(JsonLedger)` - Loaded ledger (empty if the file does not exist)
    /// * `Err(LedgerError)` - The file exists but cannot be read or parsed
    pub fn open(path: &Path) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let records = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                let records: BTreeMap<String, VisitRecord> = serde_json::from_str(&content)
                    .map_err(|e| LedgerError::Corrupt {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                tracing::debug!("Loaded {} URLs from ledger {}", records.len(), path.display());
                rekey(records)
            }
        } else {
            tracing::debug!("No ledger at {}, starting fresh", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            records,
        })
    }

    /// Creates a ledger that is never written to disk (for testing)
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: BTreeMap::new(),
        }
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the ledger has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records a visit with an explicit timestamp
    pub fn mark_visited_at(
        &mut self,
        url: &str,
        success: bool,
        email_count: u32,
        error: Option<&str>,
        at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let key = canonical_key(url);
        let error = error.map(str::to_string);

        match self.records.get_mut(&key) {
            Some(record) => record.revisit(at, success, email_count, error),
            None => {
                let record = VisitRecord::new(key.clone(), at, success, email_count, error);
                self.records.insert(key.clone(), record);
            }
        }

        self.save()?;
        tracing::debug!("Marked URL as visited: {}", key);
        Ok(())
    }

    /// Removes records visited at or before `now - max_age`
    pub fn cleanup_at(&mut self, max_age: Duration, now: DateTime<Utc>) -> LedgerResult<usize> {
        let cutoff = now
            .checked_sub_signed(max_age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let before = self.records.len();
        self.records.retain(|_, record| record.visited_at > cutoff);
        let removed = before - self.records.len();

        if removed > 0 {
            self.save()?;
            tracing::info!("Cleaned up {} old entries from ledger", removed);
        }

        Ok(removed)
    }

    /// Writes the ledger to its file via a temporary sibling and a rename
    fn save(&self) -> LedgerResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.records)?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        tracing::trace!("Saved {} URLs to {}", self.records.len(), path.display());
        Ok(())
    }
}

/// Re-keys loaded records by normalized URL
///
/// Older files may store keys in a different form (`https://example.com`
/// rather than `https://example.com/`). Records that collapse onto one key
/// keep the latest visit and the earliest `first_visited`.
fn rekey(records: BTreeMap<String, VisitRecord>) -> BTreeMap<String, VisitRecord> {
    let mut normalized: BTreeMap<String, VisitRecord> = BTreeMap::new();

    for (stored_key, mut record) in records {
        let key = canonical_key(&stored_key);
        record.url = key.clone();

        match normalized.get_mut(&key) {
            Some(existing) => {
                tracing::debug!("Merging duplicate ledger entry {} into {}", stored_key, key);
                let first_visited = existing.first_visited.min(record.first_visited);
                if record.visited_at > existing.visited_at {
                    *existing = record;
                }
                existing.first_visited = first_visited;
            }
            None => {
                normalized.insert(key, record);
            }
        }
    }

    normalized
}

impl Ledger for JsonLedger {
    fn is_visited(&self, url: &str) -> bool {
        self.records.contains_key(&canonical_key(url))
    }

    fn get(&self, url: &str) -> Option<&VisitRecord> {
        self.records.get(&canonical_key(url))
    }

    fn mark_visited(
        &mut self,
        url: &str,
        success: bool,
        email_count: u32,
        error: Option<&str>,
    ) -> LedgerResult<()> {
        self.mark_visited_at(url, success, email_count, error, Utc::now())
    }

    fn remove(&mut self, url: &str) -> LedgerResult<bool> {
        let key = canonical_key(url);
        if self.records.remove(&key).is_some() {
            self.save()?;
            tracing::info!("Removed URL from ledger: {}", key);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn clear(&mut self) -> LedgerResult<()> {
        self.records.clear();
        self.save()?;
        tracing::info!("Cleared URL ledger");
        Ok(())
    }

    fn cleanup(&mut self, max_age: Duration) -> LedgerResult<usize> {
        self.cleanup_at(max_age, Utc::now())
    }

    fn stats(&self) -> LedgerStats {
        LedgerStats::from_records(self.records.values())
    }

    fn records(&self) -> Vec<&VisitRecord> {
        self.records.values().collect()
    }
}
