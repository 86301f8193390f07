//! HTTP fetcher implementation
//!
//! This module handles all page requests made by the crawler, including:
//! - Building the HTTP client from configuration
//! - GET requests with redirect following
//! - Classifying responses and failures

use crate::config::Config;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, TLS, too many redirects)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true for an HTML page
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    /// Human-readable description of a failed fetch, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::ContentMismatch { content_type } => {
                Some(format!("Expected HTML, got {}", content_type))
            }
            FetchResult::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            FetchResult::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds the HTTP client used for page requests
///
/// The client sends the configured user agent, applies the configured
/// timeout, follows up to 10 redirects and accepts gzip and brotli bodies.
///
/// # Example
///
/// ```no_run
/// use lead_scout::config::Config;
/// use lead_scout::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.scraping.user_agent.clone())
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10).min(config.request_timeout()))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML Content-Type | `Success` |
/// | 2xx with any other Content-Type | `ContentMismatch` |
/// | Non-2xx status | `HttpError` |
/// | Timeout, refused connection, redirect loop | `NetworkError` |
///
/// A response without a Content-Type header is treated as HTML.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            if !is_html(&content_type) {
                return FetchResult::ContentMismatch { content_type };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    content_type,
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: format!("Failed to read body: {}", e),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_redirect() {
                "Too many redirects".to_string()
            } else if e.is_connect() {
                "Connection failed".to_string()
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}
