use crate::common::{create_client, create_test_config, mount_ai, mount_pages, root_key};
use lead_scout::crawler::{Coordinator, RunOptions, SiteStatus};
use lead_scout::ledger::{export_ledger_csv, JsonLedger, Ledger};
use wiremock::MockServer;

#[tokio::test]
async fn test_visited_sites_are_skipped_until_forced() {
    let ai = MockServer::start().await;
    let site = MockServer::start().await;

    mount_pages(&site, &[("/", "<p>team@greenleaf.org</p>")]).await;
    mount_ai(&ai, &[site.uri()]).await;

    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("visited.json");
    let config = create_test_config(&ai.uri(), &cache_file);
    let mut options = RunOptions::from_config(&config);

    // First run scrapes the site
    let mut coordinator = Coordinator::new(
        config.clone(),
        create_client(&config),
        JsonLedger::open(&cache_file).unwrap(),
    )
    .unwrap();
    let report = coordinator.run("garden centers", &options).await.unwrap();
    assert_eq!(report.sites[0].status, SiteStatus::Scraped);
    assert_eq!(report.emails_collected, 1);
    let first_visit = coordinator
        .ledger()
        .get(&root_key(&site))
        .expect("record after first run")
        .clone();
    drop(coordinator);

    // Second run with a reopened ledger skips it
    let mut coordinator = Coordinator::new(
        config.clone(),
        create_client(&config),
        JsonLedger::open(&cache_file).unwrap(),
    )
    .unwrap();
    let report = coordinator.run("garden centers", &options).await.unwrap();
    assert_eq!(report.sites[0].status, SiteStatus::SkippedVisited);
    assert_eq!(report.sites_skipped(), 1);
    assert_eq!(report.emails_collected, 0);
    assert!(coordinator.collector().is_empty());

    // Forced run scrapes it again and updates the record in place
    options.force_rescrape = true;
    let report = coordinator.run("garden centers", &options).await.unwrap();
    assert_eq!(report.sites[0].status, SiteStatus::Scraped);
    assert_eq!(report.emails_collected, 1);

    let record = coordinator.ledger().get(&root_key(&site)).unwrap();
    assert_eq!(coordinator.ledger().stats().total, 1);
    assert_eq!(record.visit_count, 2);
    assert_eq!(record.first_visited, first_visit.first_visited);
    assert!(record.visited_at >= first_visit.visited_at);
}

#[tokio::test]
async fn test_cache_maintenance_after_run() {
    let ai = MockServer::start().await;
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    mount_pages(&first, &[("/", "<p>one@firstshop.com</p>")]).await;
    mount_pages(&second, &[("/", "<p>nothing to see</p>")]).await;
    mount_ai(&ai, &[first.uri(), second.uri()]).await;

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
    coordinator.run("shops", &options).await.unwrap();
    let (mut ledger, _) = coordinator.into_parts();

    let stats = ledger.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.total_emails, 1);

    let unvisited = ledger.filter_unvisited(&[
        first.uri(),
        "https://new.example.org".to_string(),
    ]);
    assert_eq!(unvisited, vec!["https://new.example.org".to_string()]);

    let export = dir.path().join("cache.csv");
    assert_eq!(export_ledger_csv(&ledger, &export).unwrap(), 2);
    let csv = std::fs::read_to_string(&export).unwrap();
    assert!(csv.starts_with("url,first_visited,visited_at,visit_count,success,email_count,error"));
    assert!(csv.contains(&root_key(&first)));

    assert!(ledger.remove(&first.uri()).unwrap());
    assert!(!ledger.is_visited(&first.uri()));
    assert!(ledger.is_visited(&second.uri()));

    assert_eq!(ledger.cleanup(chrono::Duration::days(365_000)).unwrap(), 0);
    assert_eq!(ledger.cleanup(chrono::Duration::days(0)).unwrap(), 1);

    let reopened = JsonLedger::open(&cache_file).unwrap();
    assert!(reopened.is_empty());
}
