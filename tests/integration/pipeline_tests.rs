use crate::common::{
    create_client, create_test_config, mount_ai, mount_failing_site, mount_pages, root_key,
    API_KEY,
};
use lead_scout::collector::{EmailCollector, OutputFormat};
use lead_scout::crawler::{Coordinator, RunOptions, SiteStatus};
use lead_scout::ledger::{JsonLedger, Ledger};
use lead_scout::ScoutError;
use std::collections::BTreeSet;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_run_collects_emails_and_records_visits() {
    let ai = MockServer::start().await;
    let bakery = MockServer::start().await;
    let broken = MockServer::start().await;

    mount_pages(
        &bakery,
        &[
            (
                "/",
                r#"<html><head><title>Crumb</title></head><body>
                   <p>Orders: orders@crumbbakery.com</p>
                   <a href="/contact">Contact</a>
                   <a href="/menu.pdf">Menu</a>
                   </body></html>"#,
            ),
            (
                "/contact",
                r#"<html><body>
                   <a href="mailto:owner@crumbbakery.com?subject=Hi">Email the owner</a>
                   <p>Press: press@crumbbakery.com</p>
                   <p>Do not use test@example.com</p>
                   </body></html>"#,
            ),
        ],
    )
    .await;
    mount_failing_site(&broken, 500).await;
    mount_ai(&ai, &[bakery.uri(), broken.uri()]).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let cache_file = dir.path().join("storage").join("visited.json");
    let config = create_test_config(&ai.uri(), &cache_file);
    let options = RunOptions::from_config(&config);

    let ledger = JsonLedger::open(&cache_file).expect("Failed to open ledger");
    let mut coordinator =
        Coordinator::new(config.clone(), create_client(&config), ledger).expect("coordinator");

    let report = coordinator
        .run("artisan bakeries", &options)
        .await
        .expect("Run should succeed");

    assert_eq!(report.topic, "artisan bakeries");
    assert_eq!(report.analysis.industry, "Food");
    assert_eq!(report.candidates.len(), 2);
    assert_eq!(report.sites_scraped(), 1);
    assert_eq!(report.sites_failed(), 1);
    assert_eq!(report.pages_crawled(), 2);

    let failed = report
        .sites
        .iter()
        .find(|s| s.status == SiteStatus::Failed)
        .expect("failed site");
    assert_eq!(failed.error.as_deref(), Some("HTTP 500"));

    let emails: BTreeSet<&str> = coordinator
        .collector()
        .records()
        .into_iter()
        .map(|r| r.email.as_str())
        .collect();
    assert_eq!(
        emails,
        BTreeSet::from([
            "orders@crumbbakery.com",
            "owner@crumbbakery.com",
            "press@crumbbakery.com"
        ])
    );
    assert_eq!(report.emails_collected, 3);

    // Both sites are in the ledger and the file survives a reopen
    let (ledger, collector) = coordinator.into_parts();
    assert_eq!(ledger.stats().total, 2);
    drop(ledger);

    let reopened = JsonLedger::open(&cache_file).expect("Failed to reopen ledger");
    let good = reopened.get(&root_key(&bakery)).expect("bakery record");
    assert!(good.success);
    assert_eq!(good.email_count, 3);
    let bad = reopened.get(&root_key(&broken)).expect("broken record");
    assert!(!bad.success);
    assert_eq!(bad.email_count, 0);
    assert_eq!(bad.error.as_deref(), Some("HTTP 500"));

    // Export and read back
    let output = dir.path().join("out").join("leads.csv");
    assert_eq!(collector.export(OutputFormat::Csv, &output).unwrap(), 3);

    let mut reread = EmailCollector::default();
    assert_eq!(reread.merge_file(&output).unwrap(), 3);
    let pairs: BTreeSet<(String, String)> = reread
        .records()
        .into_iter()
        .map(|r| (r.email.clone(), r.source_url.clone()))
        .collect();
    let original: BTreeSet<(String, String)> = collector
        .records()
        .into_iter()
        .map(|r| (r.email.clone(), r.source_url.clone()))
        .collect();
    assert_eq!(pairs, original);
}

#[tokio::test]
async fn test_min_confidence_option_filters_emails() {
    let ai = MockServer::start().await;
    let site = MockServer::start().await;

    mount_pages(
        &site,
        &[("/", "<p>sales@acme.org and info@shop.io</p>")],
    )
    .await;
    mount_ai(&ai, &[site.uri()]).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&ai.uri(), &dir.path().join("visited.json"));
    let mut options = RunOptions::from_config(&config);
    options.min_confidence = 0.9;

    let mut coordinator =
        Coordinator::new(config.clone(), create_client(&config), JsonLedger::in_memory()).unwrap();
    coordinator.run("widgets", &options).await.unwrap();

    let emails: Vec<&str> = coordinator
        .collector()
        .records()
        .into_iter()
        .map(|r| r.email.as_str())
        .collect();
    assert_eq!(emails, vec!["sales@acme.org"]);
}

#[tokio::test]
async fn test_json_export_carries_run_metadata() {
    let ai = MockServer::start().await;
    let site = MockServer::start().await;

    mount_pages(&site, &[("/", "<p>hello@bakehouse.org</p>")]).await;
    mount_ai(&ai, &[site.uri()]).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&ai.uri(), &dir.path().join("visited.json"));
    let options = RunOptions::from_config(&config);

    let mut coordinator =
        Coordinator::new(config.clone(), create_client(&config), JsonLedger::in_memory()).unwrap();
    coordinator.run("bakehouses", &options).await.unwrap();

    let output = dir.path().join("leads.json");
    coordinator
        .collector()
        .export(OutputFormat::Json, &output)
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["metadata"]["topic"], "bakehouses");
    assert_eq!(value["metadata"]["total_websites"], 1);
    assert_eq!(value["metadata"]["total_emails"], 1);
    assert_eq!(value["emails"][0]["email"], "hello@bakehouse.org");
}

#[tokio::test]
async fn test_rejected_api_key_aborts_before_scraping() {
    let ai = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{ "reason": "API_KEY_INVALID" }]
            }
        })))
        .mount(&ai)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("visited.json");
    let config = create_test_config(&ai.uri(), &cache_file);
    let options = RunOptions::from_config(&config);

    let mut coordinator = Coordinator::new(
        config.clone(),
        create_client(&config),
        JsonLedger::open(&cache_file).unwrap(),
    )
    .unwrap();

    let err = coordinator.run("bakeries", &options).await.unwrap_err();
    assert!(matches!(err, ScoutError::Authentication(_)));
    assert!(!err.to_string().contains(API_KEY));
    assert!(coordinator.ledger().is_empty());
}

#[tokio::test]
async fn test_quota_exhaustion_is_reported() {
    let ai = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&ai)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&ai.uri(), &dir.path().join("visited.json"));
    let options = RunOptions::from_config(&config);

    let mut coordinator =
        Coordinator::new(config.clone(), create_client(&config), JsonLedger::in_memory()).unwrap();
    let err = coordinator.run("bakeries", &options).await.unwrap_err();
    assert!(matches!(err, ScoutError::QuotaExceeded(_)));
}

#[tokio::test]
async fn test_unusable_candidate_list_yields_empty_run() {
    let ai = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(crate::common::model_answer("I cannot help with that."))
        .mount(&ai)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&ai.uri(), &dir.path().join("visited.json"));
    let options = RunOptions::from_config(&config);

    let mut coordinator =
        Coordinator::new(config.clone(), create_client(&config), JsonLedger::in_memory()).unwrap();
    let report = coordinator.run("bakeries", &options).await.unwrap();

    assert!(report.candidates.is_empty());
    assert!(report.sites.is_empty());
    assert_eq!(report.analysis.industry, "General");
    assert!(coordinator.collector().is_empty());
}
