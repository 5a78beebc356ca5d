//! End-to-end monitor runs against a mocked marketplace and webhook.

use std::sync::Arc;

use tempfile::TempDir;
use vitrine::models::{Config, ProfileConfig};
use vitrine::notify::WebhookClient;
use vitrine::pipeline::run_monitor;
use vitrine::state::{LedgerStore, LocalLedgerStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PAGE: &str = r#"
    <html><body>
      <a href="/items/111-wool-sweater">Wool sweater</a>
      <a href="/items/222-denim-jacket">Denim jacket</a>
    </body></html>
"#;

const SWEATER_PAGE: &str = r#"
    <html>
    <head>
      <meta property="product:price:amount" content="25.00" />
      <meta property="product:price:currency" content="EUR" />
      <meta property="og:image" content="https://img.example/sweater.jpg" />
    </head>
    <body><h1>Wool sweater</h1></body>
    </html>
"#;

const JACKET_PAGE: &str = r#"
    <html><body><h1>Denim jacket</h1></body></html>
"#;

async fn mock_marketplace(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/member/9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_PAGE))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/items/111-wool-sweater"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SWEATER_PAGE))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/items/222-denim-jacket"))
        .respond_with(ResponseTemplate::new(200).set_body_string(JACKET_PAGE))
        .mount(server)
        .await;
}

fn test_config(server: &MockServer) -> Arc<Config> {
    let mut config = Config::default();
    config.http.request_delay_ms = 0;
    config.http.retry_backoff_ms = 1;
    config.webhook.retry_backoff_ms = 1;
    config.profiles.push(ProfileConfig {
        name: "test-seller".to_string(),
        url: format!("{}/member/9", server.uri()),
    });
    Arc::new(config)
}

#[tokio::test]
async fn posts_new_listings_and_suppresses_reposts() {
    let server = MockServer::start().await;
    mock_marketplace(&server).await;

    // Both listings delivered once across the two runs
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let tmp = TempDir::new().unwrap();
    let store = LocalLedgerStore::new(tmp.path().join("ledger.json"));
    let webhook =
        WebhookClient::new(&config.webhook, format!("{}/hook", server.uri())).unwrap();

    let first = run_monitor(&config, &store, Some(&webhook)).await.unwrap();
    assert_eq!(first.listings_seen, 2);
    assert_eq!(first.posted, 2);
    assert_eq!(first.post_failures, 0);

    let ledger = store.load().await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert!(ledger.record("item:111").is_some());
    assert!(ledger.record("item:222").is_some());

    // Second run inside the suppression window: nothing new
    let second = run_monitor(&config, &store, Some(&webhook)).await.unwrap();
    assert_eq!(second.posted, 0);
    assert_eq!(second.skipped_recent, 2);
}

#[tokio::test]
async fn failed_delivery_leaves_ledger_unmarked() {
    let server = MockServer::start().await;
    mock_marketplace(&server).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let tmp = TempDir::new().unwrap();
    let store = LocalLedgerStore::new(tmp.path().join("ledger.json"));
    let webhook =
        WebhookClient::new(&config.webhook, format!("{}/hook", server.uri())).unwrap();

    let outcome = run_monitor(&config, &store, Some(&webhook)).await.unwrap();
    assert_eq!(outcome.posted, 0);
    assert_eq!(outcome.post_failures, 2);

    // Nothing confirmed, so the next run must retry both
    let ledger = store.load().await.unwrap();
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn dry_run_neither_delivers_nor_marks() {
    let server = MockServer::start().await;
    mock_marketplace(&server).await;

    // No webhook mock mounted: any POST would 404 and fail the counters below

    let config = test_config(&server);
    let tmp = TempDir::new().unwrap();
    let ledger_path = tmp.path().join("ledger.json");
    let store = LocalLedgerStore::new(&ledger_path);

    let outcome = run_monitor(&config, &store, None).await.unwrap();
    assert_eq!(outcome.posted, 2);
    assert_eq!(outcome.post_failures, 0);
    assert!(!ledger_path.exists());
}

#[tokio::test]
async fn unreachable_profile_fails_soft() {
    let server = MockServer::start().await;
    // Marketplace serves nothing: profile fetch gets 404s

    let config = test_config(&server);
    let tmp = TempDir::new().unwrap();
    let store = LocalLedgerStore::new(tmp.path().join("ledger.json"));
    let webhook =
        WebhookClient::new(&config.webhook, format!("{}/hook", server.uri())).unwrap();

    let outcome = run_monitor(&config, &store, Some(&webhook)).await.unwrap();
    assert_eq!(outcome.profile_total, 1);
    assert_eq!(outcome.profile_failures, 1);
    assert_eq!(outcome.listings_seen, 0);
    assert_eq!(outcome.posted, 0);
}

#[tokio::test]
async fn per_profile_cap_bounds_posts() {
    let server = MockServer::start().await;
    mock_marketplace(&server).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.http.request_delay_ms = 0;
    config.webhook.max_new_per_profile = 1;
    config.profiles.push(ProfileConfig {
        name: "test-seller".to_string(),
        url: format!("{}/member/9", server.uri()),
    });
    let config = Arc::new(config);

    let tmp = TempDir::new().unwrap();
    let store = LocalLedgerStore::new(tmp.path().join("ledger.json"));
    let webhook =
        WebhookClient::new(&config.webhook, format!("{}/hook", server.uri())).unwrap();

    let outcome = run_monitor(&config, &store, Some(&webhook)).await.unwrap();
    assert_eq!(outcome.posted, 1);

    let ledger = store.load().await.unwrap();
    assert_eq!(ledger.len(), 1);
}
