use crate::ai::SiteAdvisor;
use crate::config::Config;
use crate::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the Generative Language `generateContent` REST endpoint
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiClient {
    /// Creates a client from the AI service settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no API key is set.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let client = Client::builder()
            .timeout(config.request_timeout().max(Duration::from_secs(30)))
            .build()?;

        Ok(Self::with_client(
            client,
            api_key,
            config.google.model.clone(),
            config.google.api_base.clone(),
        ))
    }

    /// Creates a client around an existing HTTP client
    pub fn with_client(client: Client, api_key: String, model: String, api_base: String) -> Self {
        tracing::info!("Initialized AI client with model: {}", model);
        Self {
            client,
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint URL without the key query parameter
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

#[async_trait]
impl SiteAdvisor for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let endpoint = self.endpoint();
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoutError::Network {
                url: endpoint.clone(),
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ScoutError::Network {
            url: endpoint.clone(),
            message: e.without_url().to_string(),
        })?;

        if !status.is_success() {
            let error = classify_error(status, &body);
            tracing::error!("AI service request failed: {}", error);
            return Err(error);
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ScoutError::AiResponse(format!("malformed response body: {}", e)))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        // Empty answers flow to the callers' fallbacks
        if text.trim().is_empty() {
            tracing::warn!("AI service returned no text");
            return Ok(String::new());
        }

        Ok(text)
    }
}

/// Maps a non-success response onto an error kind
fn classify_error(status: StatusCode, body: &str) -> ScoutError {
    let (message, api_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.chars().take(200).collect(), String::new()),
    };

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || body.contains("API_KEY_INVALID")
    {
        ScoutError::Authentication(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS
        || api_status == "RESOURCE_EXHAUSTED"
        || body.contains("RESOURCE_EXHAUSTED")
    {
        ScoutError::QuotaExceeded(message)
    } else {
        ScoutError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
