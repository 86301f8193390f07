//! Pipeline coordinator - main run orchestration logic
//!
//! This module drives one lead-generation run:
//! - Validating the topic
//! - Asking the AI service for a topic analysis and candidate websites
//! - Consulting the visited-URL ledger before each site
//! - Crawling sites and feeding their emails to the collector
//! - Recording every attempt in the ledger

use crate::ai::{SiteAdvisor, TopicAnalysis, WebsiteCandidate};
use crate::collector::{AddOutcome, EmailCollector};
use crate::config::Config;
use crate::crawler::site::{SiteCrawler, SiteLimits};
use crate::crawler::throttle::Throttle;
use crate::crawler::build_http_client;
use crate::extract::EmailExtractor;
use crate::ledger::Ledger;
use crate::url::normalize_url;
use crate::{Result, ScoutError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Longest accepted topic, in characters
pub const MAX_TOPIC_LENGTH: usize = 200;

/// Per-run settings, defaulting to the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Maximum candidate websites requested from the AI service
    pub max_sites: usize,

    /// Country hint for candidate generation
    pub country: String,

    /// Language hint for candidate generation
    pub language: String,

    /// Minimum confidence for an email to be kept
    pub min_confidence: f64,

    /// Crawl sites even if the ledger has already seen them
    pub force_rescrape: bool,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_sites: config.scraping.max_websites as usize,
            country: config.search.country.clone(),
            language: config.search.language.clone(),
            min_confidence: config.output.min_confidence,
            force_rescrape: false,
        }
    }
}

/// What happened to one candidate website
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteStatus {
    /// Crawled successfully
    Scraped,
    /// The root page could not be fetched
    Failed,
    /// Already in the ledger and not forced
    SkippedVisited,
    /// Same normalized URL as an earlier candidate in this run
    Duplicate,
    /// The proposed URL could not be normalized
    InvalidUrl,
}

/// Per-site entry in a [`RunReport`]
#[derive(Debug, Clone)]
pub struct SiteOutcome {
    pub url: String,
    pub status: SiteStatus,
    pub pages_crawled: usize,
    /// Distinct addresses found on the site
    pub emails_found: usize,
    /// Addresses that were new to (or improved) the collector
    pub emails_added: usize,
    pub error: Option<String>,
}

impl SiteOutcome {
    fn skipped(url: String, status: SiteStatus, error: Option<String>) -> Self {
        Self {
            url,
            status,
            pages_crawled: 0,
            emails_found: 0,
            emails_added: 0,
            error,
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub topic: String,
    pub analysis: TopicAnalysis,
    pub candidates: Vec<WebsiteCandidate>,
    pub sites: Vec<SiteOutcome>,
    pub emails_collected: usize,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl RunReport {
    fn count(&self, status: SiteStatus) -> usize {
        self.sites.iter().filter(|s| s.status == status).count()
    }

    pub fn sites_scraped(&self) -> usize {
        self.count(SiteStatus::Scraped)
    }

    pub fn sites_failed(&self) -> usize {
        self.count(SiteStatus::Failed)
    }

    /// Candidates not crawled: already visited, duplicated or unparseable
    pub fn sites_skipped(&self) -> usize {
        self.sites.len() - self.sites_scraped() - self.sites_failed()
    }

    pub fn pages_crawled(&self) -> usize {
        self.sites.iter().map(|s| s.pages_crawled).sum()
    }

    pub fn emails_found(&self) -> usize {
        self.sites.iter().map(|s| s.emails_found).sum()
    }
}

/// Checks a topic and returns it trimmed
pub fn validate_topic(topic: &str) -> Result<String> {
    let topic = topic.trim();

    if topic.is_empty() {
        return Err(ScoutError::InvalidTopic("topic cannot be empty".to_string()));
    }

    let length = topic.chars().count();
    if length > MAX_TOPIC_LENGTH {
        return Err(ScoutError::InvalidTopic(format!(
            "topic is {} characters long, the maximum is {}",
            length, MAX_TOPIC_LENGTH
        )));
    }

    Ok(topic.to_string())
}

/// Main pipeline coordinator
///
/// Owns the AI client, the ledger and the collector for the duration of a
/// run. Sites are processed one at a time.
pub struct Coordinator<A: SiteAdvisor, L: Ledger> {
    config: Config,
    advisor: A,
    ledger: L,
    crawler: SiteCrawler,
    collector: EmailCollector,
}

impl<A: SiteAdvisor, L: Ledger> Coordinator<A, L> {
    /// Creates a coordinator
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScoutError)` - The HTTP client could not be built
    pub fn new(config: Config, advisor: A, ledger: L) -> Result<Self> {
        let client = build_http_client(&config)?;
        let crawler = SiteCrawler::new(
            client,
            EmailExtractor::new(config.output.min_confidence),
            SiteLimits::from_config(&config.scraping),
            Throttle::new(config.request_delay()),
        );
        let collector = EmailCollector::from_config(&config.output);

        Ok(Self {
            config,
            advisor,
            ledger,
            crawler,
            collector,
        })
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn collector(&self) -> &EmailCollector {
        &self.collector
    }

    pub fn collector_mut(&mut self) -> &mut EmailCollector {
        &mut self.collector
    }

    /// Releases the ledger and the collected emails
    pub fn into_parts(self) -> (L, EmailCollector) {
        (self.ledger, self.collector)
    }

    /// Runs the pipeline for a topic
    ///
    /// Topic validation and AI service errors abort the run before any
    /// site is crawled. Per-site failures are recorded in the ledger with
    /// `success = false` and the run continues. Ledger write failures abort.
    pub async fn run(&mut self, topic: &str, options: &RunOptions) -> Result<RunReport> {
        let topic = validate_topic(topic)?;
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!(topic = %topic, max_sites = options.max_sites, "Starting run");

        self.collector = EmailCollector::from_config(&self.config.output)
            .with_min_confidence(options.min_confidence);
        self.crawler
            .set_extractor(EmailExtractor::new(options.min_confidence));

        let analysis = self.advisor.analyze_topic(&topic).await?;
        let candidates = self
            .advisor
            .generate_website_candidates(
                &topic,
                options.max_sites,
                &options.country,
                &options.language,
            )
            .await?;

        if candidates.is_empty() {
            tracing::warn!("No website candidates found for topic: {}", topic);
        }

        let mut sites = Vec::with_capacity(candidates.len());
        let mut seen = HashSet::new();

        for (i, candidate) in candidates.iter().enumerate() {
            tracing::info!(
                "Processing website {}/{}: {}",
                i + 1,
                candidates.len(),
                candidate.url
            );
            let outcome = self.process_candidate(candidate, options, &mut seen).await?;
            sites.push(outcome);
        }

        let scraped = sites
            .iter()
            .filter(|s| s.status == SiteStatus::Scraped)
            .count();
        self.collector.describe_run(&topic, scraped, started_at);

        let report = RunReport {
            topic,
            analysis,
            candidates,
            sites,
            emails_collected: self.collector.len(),
            started_at,
            duration: start_time.elapsed(),
        };

        tracing::info!(
            "Run completed: {} sites scraped, {} failed, {} skipped, {} emails collected in {:?}",
            report.sites_scraped(),
            report.sites_failed(),
            report.sites_skipped(),
            report.emails_collected,
            report.duration
        );

        Ok(report)
    }

    /// Handles one candidate: ledger check, crawl, collect, record
    async fn process_candidate(
        &mut self,
        candidate: &WebsiteCandidate,
        options: &RunOptions,
        seen: &mut HashSet<String>,
    ) -> Result<SiteOutcome> {
        let url = match normalize_url(&candidate.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping invalid candidate URL '{}': {}", candidate.url, e);
                return Ok(SiteOutcome::skipped(
                    candidate.url.clone(),
                    SiteStatus::InvalidUrl,
                    Some(e.to_string()),
                ));
            }
        };
        let key = url.to_string();

        if !seen.insert(key.clone()) {
            tracing::debug!("Skipping duplicate candidate: {}", key);
            return Ok(SiteOutcome::skipped(key, SiteStatus::Duplicate, None));
        }

        if !options.force_rescrape && self.ledger.is_visited(&key) {
            tracing::info!("Skipping already visited website: {}", key);
            return Ok(SiteOutcome::skipped(key, SiteStatus::SkippedVisited, None));
        }

        let report = self.crawler.crawl(&url).await;
        let emails_found = report.emails.len();

        let mut emails_added = 0;
        for email in report.emails {
            match self.collector.add_extracted(email) {
                Ok(AddOutcome::Inserted) | Ok(AddOutcome::Replaced) => emails_added += 1,
                Ok(AddOutcome::Duplicate) => {}
                Err(e) => tracing::debug!("Discarded email from {}: {}", key, e),
            }
        }

        self.ledger.mark_visited(
            &key,
            report.success,
            u32::try_from(emails_found).unwrap_or(u32::MAX),
            report.error.as_deref(),
        )?;

        let status = if report.success {
            SiteStatus::Scraped
        } else {
            SiteStatus::Failed
        };

        Ok(SiteOutcome {
            url: key,
            status,
            pages_crawled: report.pages_crawled,
            emails_found,
            emails_added,
            error: report.error,
        })
    }
}
