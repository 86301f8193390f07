use lead_scout::ai::GeminiClient;
use lead_scout::config::Config;
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{body_string_contains, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key-1234";

/// Creates a test configuration pointing at a mock AI service
pub fn create_test_config(api_base: &str, cache_file: &Path) -> Config {
    let mut config = Config::default();
    config.google.api_key = Some(API_KEY.to_string());
    config.google.api_base = api_base.to_string();
    config.scraping.delay_between_requests = 0.0;
    config.scraping.timeout_seconds = 5;
    config.cache.file = cache_file.to_path_buf();
    config
}

pub fn create_client(config: &Config) -> GeminiClient {
    GeminiClient::new(config).expect("Failed to create AI client")
}

/// Wraps model text in a `generateContent` response body
pub fn model_answer(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    }))
}

/// Mounts topic-analysis and website-candidate answers on a mock AI service
pub async fn mount_ai(server: &MockServer, websites: &[String]) {
    let analysis = json!({
        "topic_summary": "Independent bakeries",
        "key_categories": ["bread", "pastry"],
        "search_keywords": ["artisan bakery"],
        "typical_domains": [],
        "industry": "Food"
    });
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
        .and(query_param("key", API_KEY))
        .and(body_string_contains("Analyze the following topic"))
        .respond_with(model_answer(&analysis.to_string()))
        .mount(server)
        .await;

    let candidates: Vec<_> = websites
        .iter()
        .enumerate()
        .map(|(i, url)| {
            json!({
                "url": url,
                "relevance_score": 1.0 - i as f64 * 0.1,
                "description": "A bakery",
                "category": "bakery"
            })
        })
        .collect();
    let answer = format!("```json\n{}\n```", json!({ "websites": candidates }));
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
        .and(query_param("key", API_KEY))
        .and(body_string_contains("Number of websites needed"))
        .respond_with(model_answer(&answer))
        .mount(server)
        .await;
}

/// Mounts HTML pages on a mock website
pub async fn mount_pages(server: &MockServer, pages: &[(&str, &str)]) {
    for (route, body) in pages {
        Mock::given(method("GET"))
            .and(path(*route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
            .mount(server)
            .await;
    }
}

/// Mounts a website whose every page fails with `status`
pub async fn mount_failing_site(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// The ledger key a mock server's root normalizes to
pub fn root_key(server: &MockServer) -> String {
    format!("{}/", server.uri())
}
