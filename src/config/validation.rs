use crate::config::types::{Config, GoogleConfig, OutputConfig, ScrapingConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

const LOG_LEVELS: &[&str] = &["DEBUG", "INFO", "WARNING", "WARN", "ERROR", "CRITICAL"];

/// Validates the entire configuration
///
/// The API key is deliberately not required here: `config` and `cache`
/// commands work without one. Commands that talk to the AI service call
/// [`Config::api_key`] instead.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_google_config(&config.google)?;
    validate_scraping_config(&config.scraping)?;
    validate_output_config(&config.output)?;
    validate_log_level(&config.logging.level)?;

    if config.cache.file.as_os_str().is_empty() {
        return Err(ConfigError::Validation("cache file cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates AI service configuration
fn validate_google_config(config: &GoogleConfig) -> Result<(), ConfigError> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    let base = Url::parse(&config.api_base).map_err(|e| {
        ConfigError::Validation(format!("Invalid api_base '{}': {}", config.api_base, e))
    })?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "api_base must use http or https, got '{}'",
            config.api_base
        )));
    }

    Ok(())
}

/// Validates crawl limits
fn validate_scraping_config(config: &ScrapingConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("max_websites", config.max_websites),
        ("max_emails_per_site", config.max_emails_per_site),
        ("max_pages_per_site", config.max_pages_per_site),
        ("max_depth", config.max_depth),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
    }

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout_seconds must be positive".to_string(),
        ));
    }

    if !config.delay_between_requests.is_finite() || config.delay_between_requests < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay_between_requests must be a non-negative number of seconds, got {}",
            config.delay_between_requests
        )));
    }

    if Duration::try_from_secs_f64(config.delay_between_requests).is_err() {
        return Err(ConfigError::Validation(format!(
            "delay_between_requests is too large, got {}",
            config.delay_between_requests
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation("user_agent cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates output settings
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.min_confidence) {
        return Err(ConfigError::Validation(format!(
            "min_confidence must be between 0 and 1, got {}",
            config.min_confidence
        )));
    }

    if config.dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("output dir cannot be empty".to_string()));
    }

    for pattern in &config.allowed_domains {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

fn validate_log_level(level: &str) -> Result<(), ConfigError> {
    if LOG_LEVELS.contains(&level.to_uppercase().as_str()) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "log_level must be one of DEBUG, INFO, WARNING, ERROR, CRITICAL, got '{}'",
            level
        )))
    }
}

/// Validates an allow-list pattern ("example.com" or "*.example.com")
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);

    if domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Domain pattern '{}' is empty",
            pattern
        )));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' contains invalid characters",
            pattern
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain.contains("..")
        || !domain.contains('.')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' is not a valid domain name",
            pattern
        )));
    }

    Ok(())
}
