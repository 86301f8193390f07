//! Breadth-first crawl of a single website

use crate::config::ScrapingConfig;
use crate::crawler::parser::parse_html;
use crate::crawler::throttle::Throttle;
use crate::crawler::{fetch_url, FetchResult};
use crate::extract::{EmailExtractor, ExtractedEmail};
use crate::url::{canonical_key, should_follow};
use reqwest::Client;
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;

/// New links queued from any one page
pub const MAX_LINKS_PER_PAGE: usize = 10;

/// Crawl limits for one website
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteLimits {
    pub max_pages: usize,
    pub max_depth: u32,
    pub max_emails: usize,
}

impl SiteLimits {
    pub fn from_config(config: &ScrapingConfig) -> Self {
        Self {
            max_pages: config.max_pages_per_site as usize,
            max_depth: config.max_depth,
            max_emails: config.max_emails_per_site as usize,
        }
    }
}

/// Outcome of crawling one website
#[derive(Debug, Clone)]
pub struct SiteReport {
    /// The root URL the crawl started from
    pub url: String,

    /// False when the root page could not be fetched
    pub success: bool,

    /// Pages fetched successfully
    pub pages_crawled: usize,

    /// Distinct addresses found, capped at the site's email limit
    pub emails: Vec<ExtractedEmail>,

    /// Why the site failed
    pub error: Option<String>,
}

/// Crawls websites page by page, sharing one throttle across all requests
pub struct SiteCrawler {
    client: Client,
    extractor: EmailExtractor,
    limits: SiteLimits,
    throttle: Throttle,
}

impl SiteCrawler {
    pub fn new(
        client: Client,
        extractor: EmailExtractor,
        limits: SiteLimits,
        throttle: Throttle,
    ) -> Self {
        Self {
            client,
            extractor,
            limits,
            throttle,
        }
    }

    pub fn limits(&self) -> SiteLimits {
        self.limits
    }

    /// Replaces the extractor, e.g. to apply a per-run confidence threshold
    pub fn set_extractor(&mut self, extractor: EmailExtractor) {
        self.extractor = extractor;
    }

    /// Crawls a website starting at `root`
    ///
    /// # Crawl Rules
    ///
    /// - Pages are visited breadth-first, root first
    /// - Only links on the same registrable domain are followed, and never
    ///   binary files or account/checkout paths
    /// - At most [`MAX_LINKS_PER_PAGE`] new links are queued per page
    /// - Links are not followed from pages at `max_depth`
    /// - The crawl stops after `max_pages` fetch attempts or once
    ///   `max_emails` distinct addresses have been found
    ///
    /// A failed root fetch fails the site. Failures on later pages are logged
    /// and skipped.
    pub async fn crawl(&mut self, root: &Url) -> SiteReport {
        tracing::info!("Crawling website: {}", root);

        let mut site = root.clone();
        let mut queue: VecDeque<(Url, u32)> = VecDeque::from([(root.clone(), 0)]);
        let mut queued: HashSet<String> = HashSet::from([canonical_key(root.as_str())]);

        let mut attempts = 0;
        let mut pages_crawled = 0;
        let mut emails = EmailSet::new(self.limits.max_emails);

        while let Some((url, depth)) = queue.pop_front() {
            if attempts >= self.limits.max_pages || emails.is_full() {
                break;
            }
            attempts += 1;

            self.throttle.wait().await;
            let result = fetch_url(&self.client, url.as_str()).await;

            let (final_url, body) = match result {
                FetchResult::Success {
                    final_url, body, ..
                } => (final_url, body),
                failure => {
                    let reason = failure.failure_reason().unwrap_or_default();
                    if depth == 0 {
                        tracing::warn!("Failed to fetch {}: {}", url, reason);
                        return SiteReport {
                            url: root.to_string(),
                            success: false,
                            pages_crawled: 0,
                            emails: Vec::new(),
                            error: Some(reason),
                        };
                    }
                    tracing::debug!("Skipping page {}: {}", url, reason);
                    continue;
                }
            };

            pages_crawled += 1;
            let page_url = Url::parse(&final_url).unwrap_or_else(|_| url.clone());
            if depth == 0 {
                // Redirects on the root page decide which site is being crawled
                site = page_url.clone();
            }

            for email in self.extractor.extract_from_html(&body, page_url.as_str()) {
                emails.offer(email);
            }

            if depth >= self.limits.max_depth {
                continue;
            }

            let parsed = parse_html(&body, &page_url);
            let mut followed = 0;
            for link in parsed.links {
                if followed >= MAX_LINKS_PER_PAGE {
                    break;
                }
                if !should_follow(&site, &link) {
                    continue;
                }
                if queued.insert(canonical_key(link.as_str())) {
                    queue.push_back((link, depth + 1));
                    followed += 1;
                }
            }
        }

        let emails = emails.into_vec();
        tracing::info!(
            "Crawled {} pages on {}, found {} emails",
            pages_crawled,
            root,
            emails.len()
        );

        SiteReport {
            url: root.to_string(),
            success: true,
            pages_crawled,
            emails,
            error: None,
        }
    }
}

/// Distinct addresses with a size cap, keeping the best-scored occurrence
struct EmailSet {
    cap: usize,
    index: HashMap<String, usize>,
    emails: Vec<ExtractedEmail>,
}

impl EmailSet {
    fn new(cap: usize) -> Self {
        Self {
            cap,
            index: HashMap::new(),
            emails: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.emails.len() >= self.cap
    }

    fn offer(&mut self, email: ExtractedEmail) {
        match self.index.get(&email.email) {
            Some(&i) => {
                if email.confidence > self.emails[i].confidence {
                    self.emails[i] = email;
                }
            }
            None if !self.is_full() => {
                self.index.insert(email.email.clone(), self.emails.len());
                self.emails.push(email);
            }
            None => {}
        }
    }

    fn into_vec(self) -> Vec<ExtractedEmail> {
        self.emails
    }
}
