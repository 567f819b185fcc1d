//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::time::{Duration, Instant};
use sumi_scrape::config::CrawlConfig;
use sumi_scrape::crawler::{crawl, Coordinator, RecordLayout};
use sumi_scrape::output::{render, OutputFormat};
use sumi_scrape::StopReason;
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at `start` with no pacing
fn create_test_config(start: String) -> CrawlConfig {
    let mut config = CrawlConfig::for_url(start);
    config.delay_secs = 0.0;
    config.jitter_secs = 0.0;
    config.timeout_secs = 5;
    config.user_agent = "TestBot/1.0".to_string();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// Mounts a listing page with one `.item` per entry and an optional next link
async fn mount_listing(server: &MockServer, page: &str, items: &[&str], next: Option<&str>) {
    let mut body: String = items
        .iter()
        .map(|item| format!(r#"<div class="item">{}</div>"#, item))
        .collect();
    if let Some(next) = next {
        body.push_str(&format!(r#"<a class="next" href="{}">Next</a>"#, next));
    }

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_page(&body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, content: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .mount(server)
        .await;
}

fn texts(records: &[sumi_scrape::Record]) -> Vec<&str> {
    records.iter().map(|r| r.get("text").unwrap()).collect()
}

#[tokio::test]
async fn test_single_page_items() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_listing(&mock_server, "/list", &["A", "B", "C"], None).await;

    let mut config = create_test_config(format!("{}/list", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.attributes = vec!["text".to_string()];

    let report = crawl(&config).await.expect("Failed to set up crawl");

    assert_eq!(texts(&report.records), vec!["A", "B", "C"]);
    assert!(report.records.iter().all(|r| r.len() == 1));
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.stop_reason, StopReason::PageLimitReached);
    assert_eq!(report.layout, RecordLayout::Fragments);
}

#[tokio::test]
async fn test_no_pagination_selector_fetches_one_page() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // A next link is present, but without a next-page selector it is ignored
    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(html_page(
            r#"<div class="item">A</div><a class="next" href="/page/2">Next</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(html_page(r#"<div class="item">B</div>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/page/1", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.max_pages = 5;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.stop_reason, StopReason::PaginationExhausted);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].get("content"), Some("A"));
}

#[tokio::test]
async fn test_pagination_until_exhausted() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_listing(&mock_server, "/page/1", &["A", "B"], Some("/page/2")).await;
    mount_listing(&mock_server, "/page/2", &["C"], Some("/page/3")).await;
    mount_listing(&mock_server, "/page/3", &["D", "E"], None).await;

    let mut config = create_test_config(format!("{}/page/1", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.attributes = vec!["text".to_string()];
    config.next_page = Some("a.next".to_string());
    config.max_pages = 10;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.stop_reason, StopReason::PaginationExhausted);
    assert_eq!(texts(&report.records), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(report.last_url.path(), "/page/3");
}

#[tokio::test]
async fn test_page_limit_stops_pagination() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_listing(&mock_server, "/page/1", &["A"], Some("/page/2")).await;
    mount_listing(&mock_server, "/page/2", &["B"], Some("/page/3")).await;
    Mock::given(method("GET"))
        .and(path("/page/3"))
        .respond_with(html_page("never"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/page/1", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.attributes = vec!["text".to_string()];
    config.next_page = Some("a.next".to_string());
    config.max_pages = 2;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.stop_reason, StopReason::PageLimitReached);
    assert_eq!(texts(&report.records), vec!["A", "B"]);
}

#[tokio::test]
async fn test_transport_error_keeps_partial_results() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_listing(&mock_server, "/page/1", &["A", "B"], Some("/page/2")).await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/page/1", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.attributes = vec!["text".to_string()];
    config.next_page = Some("a.next".to_string());
    config.max_pages = 5;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(texts(&report.records), vec!["A", "B"]);
    match &report.stop_reason {
        StopReason::TransportError { url, message } => {
            assert!(url.ends_with("/page/2"), "unexpected url {}", url);
            assert!(message.contains("500"), "unexpected message {}", message);
        }
        other => panic!("expected TransportError, got {:?}", other),
    }
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_robots_disallow_stops_before_fetch() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /private").await;

    // Disallowed page (should never be called)
    Mock::given(method("GET"))
        .and(path("/private/list"))
        .respond_with(html_page(r#"<div class="item">secret</div>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/private/list", mock_server.uri()));
    config.selector = Some(".item".to_string());

    let report = crawl(&config).await.unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.pages_fetched, 0);
    assert!(matches!(
        report.stop_reason,
        StopReason::PolicyDenied { ref url } if url.ends_with("/private/list")
    ));
}

#[tokio::test]
async fn test_robots_disallow_mid_crawl_keeps_records() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /archive").await;
    mount_listing(&mock_server, "/list", &["A"], Some("/archive/2")).await;

    let mut config = create_test_config(format!("{}/list", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.next_page = Some("a.next".to_string());
    config.max_pages = 3;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.records.len(), 1);
    assert!(matches!(report.stop_reason, StopReason::PolicyDenied { .. }));
}

#[tokio::test]
async fn test_robots_fetched_once_per_authority() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, "/page/1", &["A"], Some("/page/2")).await;
    mount_listing(&mock_server, "/page/2", &["B"], Some("/page/3")).await;
    mount_listing(&mock_server, "/page/3", &["C"], None).await;

    let mut config = create_test_config(format!("{}/page/1", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.next_page = Some("a.next".to_string());
    config.max_pages = 3;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.stop_reason, StopReason::PageLimitReached);
}

#[tokio::test]
async fn test_robots_error_fails_open() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, "/list", &["A"], None).await;

    let mut config = create_test_config(format!("{}/list", mock_server.uri()));
    config.selector = Some(".item".to_string());

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stop_reason, StopReason::PageLimitReached);
}

#[tokio::test]
async fn test_robots_missing_fails_open() {
    // No robots.txt mock: wiremock answers 404
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/list", &["A"], None).await;

    let mut config = create_test_config(format!("{}/list", mock_server.uri()));
    config.selector = Some(".item".to_string());

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, "/list", &["A"], None).await;

    let mut config = create_test_config(format!("{}/list", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.respect_robots = false;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_whole_page_records() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_listing(&mock_server, "/page/1", &["A"], Some("/page/2")).await;
    mount_listing(&mock_server, "/page/2", &["B"], None).await;

    let mut config = create_test_config(format!("{}/page/1", mock_server.uri()));
    config.next_page = Some("a.next".to_string());
    config.max_pages = 2;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.layout, RecordLayout::WholePage);
    assert_eq!(report.records.len(), 2);
    assert_eq!(
        report.records[0].keys().collect::<Vec<_>>(),
        vec!["url", "html"]
    );
    assert_eq!(
        report.records[1].get("url"),
        Some(format!("{}/page/2", mock_server.uri()).as_str())
    );
    assert!(report.records[1]
        .get("html")
        .unwrap()
        .contains(r#"<div class="item">B</div>"#));

    let csv = render(&report.records, report.layout, OutputFormat::Csv).unwrap();
    assert!(csv.starts_with("url,html\n"));
}

#[tokio::test]
async fn test_empty_match_is_not_an_error() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_listing(&mock_server, "/list", &["A"], None).await;

    let mut config = create_test_config(format!("{}/list", mock_server.uri()));
    config.selector = Some(".missing".to_string());
    config.attributes = vec!["text".to_string()];

    let report = crawl(&config).await.unwrap();

    assert!(report.records.is_empty());
    assert!(report.is_success());
    assert_eq!(
        render(&report.records, report.layout, OutputFormat::Json).unwrap(),
        "[]"
    );
    assert_eq!(
        render(&report.records, report.layout, OutputFormat::Csv).unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("late").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/slow", mock_server.uri()));
    config.timeout_secs = 1;

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.pages_fetched, 0);
    match report.stop_reason {
        StopReason::TransportError { message, .. } => {
            assert!(message.contains("timeout"), "unexpected message {}", message)
        }
        other => panic!("expected TransportError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_interrupt_before_first_fetch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_page("unused"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/list", mock_server.uri()));
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let report = Coordinator::new(&config)
        .expect("Failed to create coordinator")
        .with_interrupt(rx)
        .run()
        .await;

    assert_eq!(report.stop_reason, StopReason::Interrupted);
    assert_eq!(report.pages_fetched, 0);
    assert!(report.records.is_empty());
    assert!(report.is_success());
}

#[tokio::test]
async fn test_attributes_from_links() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/links"))
        .respond_with(html_page(
            r#"<a class="l" href="/one" title="First">One</a>
               <span class="l" href="/ignored">Two</span>"#,
        ))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/links", mock_server.uri()));
    config.selector = Some(".l".to_string());
    config.attributes = vec!["text".to_string(), "href".to_string(), "title".to_string()];

    let report = crawl(&config).await.unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].get("href"), Some("/one"));
    assert_eq!(report.records[0].get("title"), Some("First"));
    assert_eq!(report.records[1].get("text"), Some("Two"));
    assert_eq!(report.records[1].get("href"), Some(""));

    let csv = render(&report.records, report.layout, OutputFormat::Csv).unwrap();
    assert_eq!(csv, "text,href,title\nOne,/one,First\nTwo,,\n");
}

#[tokio::test]
async fn test_delay_applies_between_pages_only() {
    let delay = Duration::from_millis(300);

    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/page/1", &["A"], Some("/page/2")).await;
    mount_listing(&mock_server, "/page/2", &["B"], None).await;

    let mut config = create_test_config(format!("{}/page/1", mock_server.uri()));
    config.selector = Some(".item".to_string());
    config.next_page = Some("a.next".to_string());
    config.respect_robots = false;
    config.delay_secs = delay.as_secs_f64();
    config.max_pages = 1;

    // No wait before the first fetch
    let started = Instant::now();
    let report = crawl(&config).await.unwrap();
    assert_eq!(report.pages_fetched, 1);
    assert!(
        started.elapsed() < delay,
        "single page took {:?}",
        started.elapsed()
    );

    // One wait before the second fetch
    config.max_pages = 2;
    let started = Instant::now();
    let report = crawl(&config).await.unwrap();
    assert_eq!(report.pages_fetched, 2);
    assert!(
        started.elapsed() >= delay,
        "two pages took only {:?}",
        started.elapsed()
    );
}
