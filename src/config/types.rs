use crate::collector::{DedupKey, OutputFormat};
use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Lead-Scout
///
/// Every section has defaults, so an empty TOML file (or no file at all)
/// is a valid starting point; environment variables are layered on top.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub google: GoogleConfig,
    pub scraping: ScrapingConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Generative-AI service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GoogleConfig {
    /// API key for the Generative Language API
    pub api_key: Option<String>,

    /// Google Cloud project ID (informational)
    pub project_id: Option<String>,

    /// Model used for topic analysis and site discovery
    pub model: String,

    /// Base URL of the API, overridable for testing
    pub api_base: String,
}

/// Crawl limits and politeness settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrapingConfig {
    /// Maximum number of candidate websites per run
    pub max_websites: u32,

    /// Maximum unique emails kept per website
    pub max_emails_per_site: u32,

    /// Maximum pages fetched per website
    pub max_pages_per_site: u32,

    /// Maximum link depth from a website's root page
    pub max_depth: u32,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,

    /// User agent sent with every page request
    pub user_agent: String,

    /// Delay between consecutive requests, in seconds
    pub delay_between_requests: f64,
}

/// Search hints passed to the AI service
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    pub country: String,
    pub language: String,
}

/// Output and email acceptance settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Output file format
    pub format: OutputFormat,

    /// Directory for generated output files
    pub dir: PathBuf,

    /// Minimum confidence score for an email to be kept
    pub min_confidence: f64,

    /// Which fields make two email records the same
    pub dedup_by: DedupKey,

    /// Optional email domain allow-list ("example.com" or "*.example.com")
    pub allowed_domains: Vec<String>,
}

/// Visited-URL ledger settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Path to the ledger JSON file
    pub file: PathBuf,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// One of DEBUG, INFO, WARNING, ERROR, CRITICAL
    pub level: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            model: "gemini-1.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            max_websites: 10,
            max_emails_per_site: 50,
            max_pages_per_site: 50,
            max_depth: 3,
            timeout_seconds: 30,
            user_agent: format!("LeadScout/{}", env!("CARGO_PKG_VERSION")),
            delay_between_requests: 0.5,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            language: "en".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            dir: PathBuf::from("./emails"),
            min_confidence: 0.7,
            dedup_by: DedupKey::Email,
            allowed_domains: Vec::new(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("storage/visited_urls.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Returns the API key, or `MissingApiKey` if none is configured
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.google.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// Delay to wait between consecutive requests
    ///
    /// Negative or NaN delays mean no delay. Delays too large for a
    /// `Duration` saturate.
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.scraping.delay_between_requests.max(0.0))
            .unwrap_or(Duration::MAX)
    }

    /// HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.scraping.timeout_seconds)
    }

    /// Maps the configured log level onto a `tracing` filter directive
    pub fn tracing_level(&self) -> &'static str {
        match self.logging.level.to_uppercase().as_str() {
            "DEBUG" => "debug",
            "WARNING" | "WARN" => "warn",
            "ERROR" | "CRITICAL" => "error",
            _ => "info",
        }
    }

    /// API key with all but the last four characters hidden, for display
    pub fn masked_api_key(&self) -> String {
        match self.api_key() {
            Ok(key) if key.len() > 4 => format!("{}{}", "*".repeat(8), &key[key.len() - 4..]),
            Ok(_) => "*".repeat(8),
            Err(_) => "(not set)".to_string(),
        }
    }
}
