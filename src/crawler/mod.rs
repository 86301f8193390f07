//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and response classification
//! - HTML parsing and link extraction
//! - Request throttling
//! - Per-site breadth-first crawls
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod site;
mod throttle;

pub use coordinator::{
    validate_topic, Coordinator, RunOptions, RunReport, SiteOutcome, SiteStatus,
    MAX_TOPIC_LENGTH,
};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::{parse_html, ParsedPage};
pub use site::{SiteCrawler, SiteLimits, SiteReport, MAX_LINKS_PER_PAGE};
pub use throttle::Throttle;
