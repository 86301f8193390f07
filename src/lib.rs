//! Lead-Scout: topic-driven email lead discovery
//!
//! This crate asks a generative-AI service for websites relevant to a topic,
//! crawls those sites for email addresses, and keeps a persisted ledger of
//! visited URLs so later runs do not scrape the same site twice.

pub mod ai;
pub mod collector;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod ledger;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Lead-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication with the AI service failed: {0}")]
    Authentication(String),

    #[error("AI service quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("AI service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unusable AI response: {0}")]
    AiResponse(String),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger::LedgerError),

    #[error("Collector error: {0}")]
    Collect(#[from] collector::CollectError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Lead-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use collector::{EmailCollector, EmailRecord, OutputFormat};
pub use config::Config;
pub use ledger::{JsonLedger, Ledger, LedgerStats, VisitRecord};
pub use url::{extract_domain, normalize_url, registrable_domain};
