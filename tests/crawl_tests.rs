//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! HTTP fetcher and the full crawl cycle end-to-end.

use ripple_scraper::config::{CrawlerConfig, UserAgentConfig};
use ripple_scraper::crawler::{Coordinator, CrawlOutcome, FetchError, Fetcher, HttpFetcher};
use ripple_scraper::extract::{BitcoinAddressCallback, PatternCallback};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENESIS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
const P2SH: &str = "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy";

/// Creates a crawler configuration suitable for a local mock server
fn test_crawler_config(workers: usize) -> CrawlerConfig {
    CrawlerConfig {
        workers,
        request_timeout: 2.0,
        verbose: false,
        max_pages: None,
    }
}

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
    }
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetcher_returns_body_and_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hello"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_user_agent()).expect("Failed to build fetcher");
    let page = fetcher
        .fetch(&format!("{}/hello", mock_server.uri()), Duration::from_secs(2))
        .await
        .expect("Fetch should succeed");

    assert_eq!(page.status_code, 200);
    assert_eq!(page.body, b"hello world");
    assert!(page.final_url.ends_with("/hello"));
}

#[tokio::test]
async fn test_fetcher_classifies_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_user_agent()).expect("Failed to build fetcher");
    let result = fetcher
        .fetch(&format!("{}/missing", mock_server.uri()), Duration::from_secs(2))
        .await;

    assert_eq!(result.unwrap_err(), FetchError::Status(404));
}

#[tokio::test]
async fn test_fetcher_classifies_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_user_agent()).expect("Failed to build fetcher");
    let result = fetcher
        .fetch(&format!("{}/empty", mock_server.uri()), Duration::from_secs(2))
        .await;

    assert_eq!(result.unwrap_err(), FetchError::EmptyBody);
}

#[tokio::test]
async fn test_fetcher_classifies_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_user_agent()).expect("Failed to build fetcher");
    let result = fetcher
        .fetch(
            &format!("{}/slow", mock_server.uri()),
            Duration::from_millis(200),
        )
        .await;

    assert_eq!(result.unwrap_err(), FetchError::Timeout);
}

#[tokio::test]
async fn test_full_crawl_collects_addresses() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Index links to two pages plus one that 404s
    mount_html(
        &mock_server,
        "/",
        format!(
            r#"<html><body>
            <p>Donate: {genesis}</p>
            <a href="{base}/page1">Page 1</a>
            <a href="{base}/page2">Page 2</a>
            <a href="{base}/gone">Gone</a>
            <a href="/relative">Relative links are not followed</a>
            </body></html>"#,
            genesis = GENESIS,
            base = base_url
        ),
    )
    .await;

    // page1 repeats the genesis address and links back to the index
    mount_html(
        &mock_server,
        "/page1",
        format!(
            r#"<html><body>
            <p>{genesis} and {p2sh}</p>
            <a href="{base}/">Home</a>
            </body></html>"#,
            genesis = GENESIS,
            p2sh = P2SH,
            base = base_url
        ),
    )
    .await;

    // page2 has a malformed candidate only
    mount_html(
        &mock_server,
        "/page2",
        "<html><body>1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb</body></html>".to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    // The relative link must never be requested
    Mock::given(method("GET"))
        .and(path("/relative"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unreachable"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let coordinator: Coordinator<String> = Coordinator::builder(test_crawler_config(4))
        .user_agent(test_user_agent())
        .callback(BitcoinAddressCallback::new())
        .build()
        .expect("Failed to create coordinator");

    let report = coordinator
        .run(&[format!("{}/", base_url)])
        .await
        .expect("Crawl failed");

    let expected: HashSet<String> = [GENESIS, P2SH].iter().map(|s| s.to_string()).collect();
    assert_eq!(report.results, expected);
    assert_eq!(report.outcome, CrawlOutcome::Completed);

    // index, page1, page2, gone
    assert_eq!(report.visited, 4);
    assert_eq!(report.batch_sizes, vec![1, 3]);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.callback_failures, 0);
}

#[tokio::test]
async fn test_crawl_with_pattern_callback_and_small_pool() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // A chain of pages: / -> /a -> /b, each carrying one ticket number
    mount_html(
        &mock_server,
        "/",
        format!(r#"TICKET-1 <a href="{}/a">a</a>"#, base_url),
    )
    .await;
    mount_html(
        &mock_server,
        "/a",
        format!(r#"TICKET-2 <a href="{}/b">b</a>"#, base_url),
    )
    .await;
    mount_html(&mock_server, "/b", "TICKET-3 TICKET-1".to_string()).await;

    let coordinator: Coordinator<String> = Coordinator::builder(test_crawler_config(1))
        .user_agent(test_user_agent())
        .callback(PatternCallback::new(r"TICKET-[0-9]+").expect("valid pattern"))
        .build()
        .expect("Failed to create coordinator");

    let report = coordinator
        .run(&[format!("{}/", base_url)])
        .await
        .expect("Crawl failed");

    let expected: HashSet<String> = ["TICKET-1", "TICKET-2", "TICKET-3"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(report.results, expected);
    assert_eq!(report.batch_sizes, vec![1, 1, 1]);
    assert_eq!(report.visited, 3);
}

#[tokio::test]
async fn test_timed_out_seed_yields_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(GENESIS)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = CrawlerConfig {
        request_timeout: 0.2,
        ..test_crawler_config(2)
    };
    let coordinator: Coordinator<String> = Coordinator::builder(config)
        .user_agent(test_user_agent())
        .callback(BitcoinAddressCallback::new())
        .build()
        .expect("Failed to create coordinator");

    let report = coordinator
        .run(&[format!("{}/", mock_server.uri())])
        .await
        .expect("Crawl failed");

    assert!(report.results.is_empty());
    assert_eq!(report.visited, 1);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.outcome, CrawlOutcome::Completed);
}
