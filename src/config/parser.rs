use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;
use std::str::FromStr;

/// Loads the configuration from defaults, an optional TOML file and the environment
///
/// Layering order (later wins):
/// 1. Built-in defaults
/// 2. The TOML file at `path`, if given
/// 3. A `.env` file in the working directory, if present
/// 4. Process environment variables
///
/// # Example
///
/// ```no_run
/// use lead_scout::config::load_config;
///
/// let config = load_config(None).unwrap();
/// println!("Max websites: {}", config.scraping.max_websites);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };

    match dotenvy::dotenv() {
        Ok(env_path) => tracing::debug!("Loaded environment from {}", env_path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    validate(&config)?;

    Ok(config)
}

/// Parses a TOML configuration file without validating it
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Applies environment-variable overrides using the given lookup function
///
/// The lookup indirection keeps tests independent of the process environment.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(v) = get("GOOGLE_API_KEY") {
        config.google.api_key = Some(v);
    }
    if let Some(v) = get("GOOGLE_PROJECT_ID") {
        config.google.project_id = Some(v);
    }
    if let Some(v) = get("GOOGLE_MODEL") {
        config.google.model = v;
    }
    if let Some(v) = get("GOOGLE_API_BASE") {
        config.google.api_base = v;
    }

    if let Some(v) = get("MAX_WEBSITES") {
        config.scraping.max_websites = parse_value("MAX_WEBSITES", &v)?;
    }
    if let Some(v) = get("MAX_EMAILS_PER_SITE") {
        config.scraping.max_emails_per_site = parse_value("MAX_EMAILS_PER_SITE", &v)?;
    }
    if let Some(v) = get("MAX_PAGES_PER_SITE") {
        config.scraping.max_pages_per_site = parse_value("MAX_PAGES_PER_SITE", &v)?;
    }
    if let Some(v) = get("MAX_DEPTH") {
        config.scraping.max_depth = parse_value("MAX_DEPTH", &v)?;
    }
    if let Some(v) = get("TIMEOUT_SECONDS") {
        config.scraping.timeout_seconds = parse_value("TIMEOUT_SECONDS", &v)?;
    }
    if let Some(v) = get("USER_AGENT") {
        config.scraping.user_agent = v;
    }
    if let Some(v) = get("DELAY_BETWEEN_REQUESTS") {
        config.scraping.delay_between_requests = parse_value("DELAY_BETWEEN_REQUESTS", &v)?;
    }

    if let Some(v) = get("SEARCH_COUNTRY") {
        config.search.country = v;
    }
    if let Some(v) = get("SEARCH_LANGUAGE") {
        config.search.language = v;
    }

    if let Some(v) = get("OUTPUT_FORMAT") {
        config.output.format = parse_value("OUTPUT_FORMAT", &v)?;
    }
    if let Some(v) = get("OUTPUT_DIR") {
        config.output.dir = v.into();
    }
    if let Some(v) = get("MIN_CONFIDENCE") {
        config.output.min_confidence = parse_value("MIN_CONFIDENCE", &v)?;
    }
    if let Some(v) = get("DEDUP_BY") {
        config.output.dedup_by = parse_value("DEDUP_BY", &v)?;
    }

    if let Some(v) = get("CACHE_FILE") {
        config.cache.file = v.into();
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.logging.level = v.to_uppercase();
    }

    Ok(())
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
