//! Generative-AI site discovery
//!
//! A [`SiteAdvisor`] turns a free-text topic into a topic analysis and a
//! ranked list of candidate websites. Implementations only provide
//! [`SiteAdvisor::generate`]; the discovery operations are built on top of it
//! and degrade to defaults when the model answers with unusable JSON.
//! Service failures (authentication, quota, transport) are never swallowed.

mod gemini;
mod prompts;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Structured description of a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    #[serde(default)]
    pub topic_summary: String,
    #[serde(default)]
    pub key_categories: Vec<String>,
    #[serde(default)]
    pub search_keywords: Vec<String>,
    #[serde(default)]
    pub typical_domains: Vec<String>,
    #[serde(default = "default_industry")]
    pub industry: String,
}

impl TopicAnalysis {
    /// Analysis used when the model's answer cannot be parsed
    pub fn fallback(topic: &str) -> Self {
        Self {
            topic_summary: topic.to_string(),
            key_categories: vec![topic.to_string()],
            search_keywords: vec![topic.to_string()],
            typical_domains: Vec::new(),
            industry: default_industry(),
        }
    }
}

fn default_industry() -> String {
    "General".to_string()
}

/// A website proposed for a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteCandidate {
    pub url: String,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Deserialize)]
struct CandidateList {
    #[serde(default)]
    websites: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct QueryList {
    #[serde(default)]
    queries: Vec<String>,
}

#[derive(Deserialize)]
struct SuggestionList {
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Source of topic analyses and website candidates
#[async_trait]
pub trait SiteAdvisor: Send + Sync {
    /// Sends a prompt to the model and returns its raw text answer
    async fn generate(&self, prompt: &str) -> crate::Result<String>;

    /// Analyzes a topic, falling back to [`TopicAnalysis::fallback`] when
    /// the answer is not the expected JSON
    async fn analyze_topic(&self, topic: &str) -> crate::Result<TopicAnalysis> {
        tracing::info!(topic = %topic, "Analyzing topic");

        let answer = self.generate(&prompts::topic_analysis(topic)).await?;
        match parse_answer::<TopicAnalysis>(&answer) {
            Ok(analysis) => {
                tracing::info!(industry = %analysis.industry, "Topic analysis complete");
                Ok(analysis)
            }
            Err(e) => {
                tracing::warn!("Unusable topic analysis, using defaults: {}", e);
                Ok(TopicAnalysis::fallback(topic))
            }
        }
    }

    /// Proposes up to `count` websites for a topic, most relevant first
    ///
    /// An unusable answer yields an empty list. Entries without a URL are
    /// skipped.
    async fn generate_website_candidates(
        &self,
        topic: &str,
        count: usize,
        country: &str,
        language: &str,
    ) -> crate::Result<Vec<WebsiteCandidate>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        tracing::info!(topic = %topic, count, country, language, "Generating website candidates");

        let answer = self
            .generate(&prompts::website_candidates(topic, count, country, language))
            .await?;

        let list = match parse_answer::<CandidateList>(&answer) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Unusable website candidate list: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut candidates: Vec<WebsiteCandidate> = list
            .websites
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<WebsiteCandidate>(item) {
                Ok(candidate) if !candidate.url.trim().is_empty() => Some(candidate),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!("Skipping malformed candidate: {}", e);
                    None
                }
            })
            .collect();

        candidates.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        candidates.truncate(count);

        tracing::info!("Generated {} website candidates", candidates.len());
        Ok(candidates)
    }

    /// Proposes search queries for a topic, with generic queries as fallback
    async fn generate_search_queries(
        &self,
        topic: &str,
        count: usize,
    ) -> crate::Result<Vec<String>> {
        let answer = self.generate(&prompts::search_queries(topic, count)).await?;
        match parse_answer::<QueryList>(&answer) {
            Ok(list) => Ok(list.queries.into_iter().take(count).collect()),
            Err(e) => {
                tracing::warn!("Unusable search query list, using defaults: {}", e);
                Ok(["companies", "organizations", "services", "contact"]
                    .iter()
                    .map(|suffix| format!("{} {}", topic, suffix))
                    .take(count)
                    .collect())
            }
        }
    }

    /// Suggests related topics; an unusable answer yields an empty list
    async fn suggest_alternative_topics(
        &self,
        topic: &str,
        count: usize,
    ) -> crate::Result<Vec<String>> {
        let answer = self.generate(&prompts::alternative_topics(topic, count)).await?;
        match parse_answer::<SuggestionList>(&answer) {
            Ok(list) => Ok(list.suggestions.into_iter().take(count).collect()),
            Err(e) => {
                tracing::warn!("Unusable topic suggestions: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

/// Strips Markdown code fences around a JSON answer
pub fn extract_json(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

fn parse_answer<T: DeserializeOwned>(answer: &str) -> serde_json::Result<T> {
    serde_json::from_str(extract_json(answer))
}
