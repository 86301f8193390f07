use crate::collector::CollectError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output file format for collected emails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Infers the format from a path's extension
    pub fn from_path(path: &std::path::Path) -> Result<Self, CollectError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(CollectError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = CollectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.extension().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which fields identify a unique email record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DedupKey {
    /// One record per address
    #[default]
    Email,

    /// One record per (address, source page) pair
    EmailAndSource,
}

impl DedupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupKey::Email => "email",
            DedupKey::EmailAndSource => "email_source",
        }
    }
}

impl FromStr for DedupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(DedupKey::Email),
            "email_source" | "email-source" => Ok(DedupKey::EmailAndSource),
            other => Err(format!(
                "unknown dedup key '{}' (expected email or email_source)",
                other
            )),
        }
    }
}

impl TryFrom<String> for DedupKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DedupKey> for String {
    fn from(key: DedupKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
