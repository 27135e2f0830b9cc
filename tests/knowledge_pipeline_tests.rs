//! Scrape -> archive -> knowledge base, against a mock screener.in.

mod support;

use std::sync::Arc;

use predicates::prelude::*;
use quantfolio::adapter::outbound::archive::JsonCompanyStore;
use quantfolio::adapter::outbound::embedding::HashingEmbedder;
use quantfolio::adapter::outbound::screener::ScreenerClient;
use quantfolio::application::knowledge::{ChunkKind, NO_DATA};
use quantfolio::application::{KnowledgeBase, ScrapePacing, ScrapeService};
use quantfolio::infrastructure::config::scraper::ScraperConfig;
use support::env::TestEnv;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TCS_PAGE: &str = r#"<html><head><title>Tata Consultancy Services Ltd | Screener</title></head>
<body>
<div class="company-ratios"><ul>
    <li><span class="name">Market Cap</span><span class="value">₹ 14,20,000 Cr.</span></li>
    <li><span class="name">Stock P/E</span><span class="value">29.1</span></li>
    <li><span class="name">ROE</span><span class="value">51.5 %</span></li>
</ul></div>
</body></html>"#;

const EMPTY_PAGE: &str = "<html><head><title>Screener</title></head><body></body></html>";

async fn mock_screener() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company/TCS/consolidated/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TCS_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company/EMPTY/consolidated/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .mount(&server)
        .await;
    server
}

fn scraper_config(server: &MockServer) -> ScraperConfig {
    ScraperConfig {
        base_url: server.uri(),
        retry_max_attempts: 1,
        backoff_ms: 0,
        ..ScraperConfig::default()
    }
}

#[tokio::test]
async fn scraped_records_become_searchable() {
    let server = mock_screener().await;
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonCompanyStore::new(dir.path()));
    let service = ScrapeService::new(
        Arc::new(ScreenerClient::from_config(&scraper_config(&server))),
        store.clone(),
        ScrapePacing::NONE,
    );
    let mut kb = KnowledgeBase::open(store, Arc::new(HashingEmbedder::new(256)), true).unwrap();
    assert_eq!(kb.context("TCS valuation", 3, None).unwrap(), NO_DATA);

    let summary = service
        .scrape_and_save(&["tcs.ns".to_string(), "EMPTY".to_string(), "MISSING".to_string()])
        .await;

    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(summary.succeeded[0].company, "Tata Consultancy Services Ltd");
    assert!(dir.path().join("TCS.json").exists());
    assert!(!dir.path().join("EMPTY.json").exists());
    let failed: Vec<&str> = summary.failed.iter().map(|f| f.symbol.as_str()).collect();
    assert_eq!(failed, vec!["EMPTY", "MISSING"]);

    // auto-refresh picks up the new file without an explicit reload
    assert!(kb.contains("TCS").unwrap());
    let hits = kb.search("Stock P/E ratio", 3, Some("TCS")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.kind, ChunkKind::Ratios);

    let context = kb.context("Stock P/E ratio", 3, Some("TCS")).unwrap();
    assert!(context.starts_with("=== RELEVANT COMPANY DATA ==="));
    assert!(context.contains("--- Tata Consultancy Services Ltd (TCS) - Ratios ---"));
    assert!(context.contains("Stock P/E"));
    assert!(context.contains("[Similarity Score: "));
}

#[tokio::test(flavor = "multi_thread")]
async fn scrape_command_writes_archive() {
    let server = mock_screener().await;
    let env = TestEnv::with_sections(&format!(
        "[scraper]\nbase_url = \"{}\"\ndelay_ms = 0\nmax_delay_ms = 0\nretry_max_attempts = 1\nbackoff_ms = 0\n",
        server.uri()
    ));

    env.cmd()
        .args(["scrape", "TCS", "MISSING"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TCS").and(predicate::str::contains("MISSING")));
    assert!(env.data_dir().join("TCS.json").exists());

    env.cmd()
        .args(["kb", "summary", "TCS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Key Financial Ratios"));

    env.cmd()
        .args(["scrape", "MISSING"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no symbol could be scraped"));
}
