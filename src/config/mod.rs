//! Configuration module for Lead-Scout
//!
//! Configuration is layered: built-in defaults, an optional TOML file, a
//! `.env` file and finally process environment variables.
//!
//! # Example
//!
//! ```no_run
//! use lead_scout::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Ledger file: {}", config.cache.file.display());
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    CacheConfig, Config, GoogleConfig, LoggingConfig, OutputConfig, ScrapingConfig, SearchConfig,
};

pub use parser::{apply_env_overrides, load_config, load_config_file};
pub use validation::validate;
