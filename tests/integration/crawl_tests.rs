//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use page_harvest::config::{CrawlerConfig, UserAgentConfig};
use page_harvest::crawler::{crawl, Crawler, ExtractionMode, FetchFailure, PageRecord, SkipReason};
use page_harvest::output::{crawl_report, summarize, to_rows};
use page_harvest::CrawlerError;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_crawler(depth_limit: u32, max_pages: usize) -> Crawler {
    Crawler::new(CrawlerConfig {
        max_pages,
        depth_limit,
        timeout_seconds: 1,
        politeness_delay_ms: 0,
    })
    .with_user_agent(UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0".to_string(),
        contact_url: None,
    })
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(title, body))
        .mount(server)
        .await;
}

/// Paths requested from the server, in arrival order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

fn page_url(server: &MockServer, page_path: &str) -> String {
    format!("{}{}", server.uri(), page_path)
}

#[tokio::test]
async fn test_same_domain_crawl_excludes_other_hosts_and_resources() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/about">About</a>
           <a href="https://other.com">Other</a>
           <a href="/file.pdf">PDF</a>"#,
    )
    .await;
    mount_page(&server, "/about", "About", "About us").await;

    let result = test_crawler(1, 10)
        .crawl(&server.uri(), ExtractionMode::Links)
        .await
        .expect("crawl should run");

    let urls: Vec<_> = result.urls().collect();
    assert_eq!(urls, vec![page_url(&server, "/"), page_url(&server, "/about")]);
    assert!(result.contains(&server.uri()));
    assert!(result.get(&server.uri()).is_some());
    assert!(!result.contains("https://other.com/"));
    assert!(!result.contains(&page_url(&server, "/file.pdf")));

    let paths = requested_paths(&server).await;
    assert!(!paths.contains(&"/file.pdf".to_string()));
}

#[tokio::test]
async fn test_depth_zero_fetches_only_start_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", "A", "").await;

    let result = test_crawler(0, 10)
        .crawl(&server.uri(), ExtractionMode::Text)
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.contains(&page_url(&server, "/")));
    assert_eq!(requested_paths(&server).await, vec!["/"]);
}

#[tokio::test]
async fn test_max_pages_one_makes_exactly_one_request() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", "A", "").await;
    mount_page(&server, "/b", "B", "").await;

    let result = test_crawler(5, 1)
        .crawl(&server.uri(), ExtractionMode::Links)
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(requested_paths(&server).await.len(), 1);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", "A", r#"<a href="/a1">A1</a>"#).await;
    mount_page(&server, "/b", "B", r#"<a href="/b1">B1</a>"#).await;
    mount_page(&server, "/a1", "A1", r#"<a href="/deeper">Too deep</a>"#).await;
    mount_page(&server, "/b1", "B1", "").await;

    let result = test_crawler(2, 10)
        .crawl(&server.uri(), ExtractionMode::Metadata)
        .await
        .unwrap();

    let urls: Vec<_> = result.urls().map(str::to_string).collect();
    let expected: Vec<_> = ["/", "/a", "/b", "/a1", "/b1"]
        .iter()
        .map(|p| page_url(&server, p))
        .collect();
    assert_eq!(urls, expected);

    let depths: Vec<_> = result.pages().iter().map(|page| page.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 2, 2]);
    assert!(!requested_paths(&server).await.contains(&"/deeper".to_string()));
}

#[tokio::test]
async fn test_relative_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new/"))
        .mount(&server)
        .await;
    mount_page(&server, "/new/", "New", r#"<a href="child">Child</a>"#).await;
    mount_page(&server, "/new/child", "Child", "").await;

    let result = test_crawler(1, 10)
        .crawl(&page_url(&server, "/old"), ExtractionMode::Metadata)
        .await
        .unwrap();

    assert!(result.contains(&page_url(&server, "/old")));
    assert!(result.contains(&page_url(&server, "/new/child")));

    let paths = requested_paths(&server).await;
    assert!(paths.contains(&"/new/child".to_string()));
    assert!(!paths.contains(&"/child".to_string()));
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "Home",
        r##"<a href="/a">A</a><a href="/a">A again</a><a href="/">Self</a><a href="#top">Top</a>"##,
    )
    .await;
    mount_page(&server, "/a", "A", r#"<a href="/">Back home</a>"#).await;

    let result = test_crawler(3, 10)
        .crawl(&server.uri(), ExtractionMode::Links)
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(requested_paths(&server).await, vec!["/", "/a"]);
}

#[tokio::test]
async fn test_timeout_skips_page_and_crawl_continues() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<a href="/slow">Slow</a><a href="/fast">Fast</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("Slow", "").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, "/fast", "Fast", "").await;

    let result = test_crawler(1, 10)
        .crawl(&server.uri(), ExtractionMode::Text)
        .await
        .unwrap();

    assert!(result.contains(&page_url(&server, "/")));
    assert!(result.contains(&page_url(&server, "/fast")));
    assert!(!result.contains(&page_url(&server, "/slow")));

    assert_eq!(result.skipped().len(), 1);
    assert_eq!(result.skipped()[0].url, page_url(&server, "/slow"));
    assert_eq!(
        result.skipped()[0].reason,
        SkipReason::Fetch(FetchFailure::Timeout)
    );
}

#[tokio::test]
async fn test_failed_fetch_consumes_page_budget() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<a href="/missing">Missing</a><a href="/ok">OK</a>"#).await;
    mount_page(&server, "/ok", "OK", "").await;

    let result = test_crawler(1, 2)
        .crawl(&server.uri(), ExtractionMode::Links)
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.visited_count(), 2);
    assert_eq!(
        result.skipped()[0].reason,
        SkipReason::Fetch(FetchFailure::Status(404))
    );
    assert_eq!(requested_paths(&server).await, vec!["/", "/missing"]);
}

#[tokio::test]
async fn test_non_200_start_page_gives_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_crawler(1, 10)
        .crawl(&server.uri(), ExtractionMode::Links)
        .await
        .expect("per-page failures never abort the crawl");

    assert!(result.is_empty());
    assert_eq!(
        result.skipped()[0].reason,
        SkipReason::Fetch(FetchFailure::Status(500))
    );
}

#[tokio::test]
async fn test_metadata_mode_record_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Hi</title><meta name="description" content="D"></head><body></body></html>"#,
        ))
        .mount(&server)
        .await;

    let result = crawl(&server.uri(), "metadata", 0, 10).await.unwrap();
    let record = result.get(&page_url(&server, "/")).expect("start page record");

    assert_eq!(
        serde_json::to_value(record).unwrap(),
        serde_json::json!({"metadata": {"title": "Hi", "description": "D"}})
    );
}

#[tokio::test]
async fn test_invalid_mode_fails_before_any_request() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", "").await;

    let err = crawl(&server.uri(), "everything", 1, 10).await.unwrap_err();

    assert!(matches!(err, CrawlerError::Config(_)));
    assert!(requested_paths(&server).await.is_empty());
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(html_page("Home", ""))
        .mount(&server)
        .await;

    let result = test_crawler(0, 1)
        .crawl(&server.uri(), ExtractionMode::Text)
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_repeated_crawl_is_identical() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<p>Hello there</p><a href="/a">A</a>"#).await;
    mount_page(&server, "/a", "A", r#"<h1>Page A</h1>"#).await;

    let crawler = test_crawler(1, 10);
    let first = crawler.crawl(&server.uri(), ExtractionMode::Analysis).await.unwrap();
    let second = crawler.crawl(&server.uri(), ExtractionMode::Analysis).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_concurrent_crawls_are_independent() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", "A", "").await;

    let crawler = test_crawler(1, 10);
    let uri = server.uri();
    let (left, right) = tokio::join!(
        crawler.crawl(&uri, ExtractionMode::Links),
        crawler.crawl(&uri, ExtractionMode::Text),
    );

    let left = left.unwrap();
    let right = right.unwrap();
    assert_eq!(left.len(), 2);
    assert_eq!(right.len(), 2);
    assert!(left.records().all(|r| r.mode() == ExtractionMode::Links));
    assert!(right.records().all(|r| r.mode() == ExtractionMode::Text));
}

#[tokio::test]
async fn test_politeness_delay_between_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", "A", "").await;
    mount_page(&server, "/b", "B", "").await;

    let crawler = Crawler::new(CrawlerConfig {
        max_pages: 10,
        depth_limit: 1,
        timeout_seconds: 1,
        politeness_delay_ms: 200,
    });

    let started = Instant::now();
    let result = crawler.crawl(&server.uri(), ExtractionMode::Links).await.unwrap();

    assert_eq!(result.len(), 3);
    // Two pauses: after the first and second pages, none after the last
    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_analysis_crawl_feeds_aggregator() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Rust News</title><meta name="description" content="Rust weekly"></head>
               <body><h1>Welcome</h1><p>Hello world</p><img src="/logo.png"><a href="/post">Post</a></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Rust Post</title></head><body><p>Short post</p></body></html>"#,
        ))
        .mount(&server)
        .await;

    let result = test_crawler(1, 10)
        .crawl(&server.uri(), ExtractionMode::Analysis)
        .await
        .unwrap();

    let stats = summarize(result.analyses());
    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.total_images, 1);
    assert_eq!(stats.total_links, 1);
    assert_eq!(stats.avg_links, 0.5);
    assert_eq!(stats.common_words[0].term, "Rust");
    assert_eq!(stats.common_words[0].count, 3);

    let rows = to_rows(result.analyses());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].url, page_url(&server, "/"));
    assert_eq!(rows[0].h1_tags, "Welcome");
    assert_eq!(rows[1].title, "Rust Post");

    let PageRecord::Analysis(home) = result.get(&page_url(&server, "/")).unwrap() else {
        panic!("expected analysis record");
    };
    assert_eq!(home.paragraphs, vec!["Hello world"]);
}

#[tokio::test]
async fn test_crawl_report_envelope() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", "").await;

    let report = crawl_report(&test_crawler(0, 10), &server.uri(), ExtractionMode::Text).await;
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["pages_crawled"], 1);
    assert!(value["results"][page_url(&server, "/")]["text"].is_string());
}

#[tokio::test]
async fn test_scrape_single_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/product",
        "Widget",
        r#"<span class="price">$10</span><span class="price">$12</span>"#,
    )
    .await;

    let outcome = test_crawler(0, 1)
        .scrape(&page_url(&server, "/product"), Some(".price"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.title.as_deref(), Some("Widget"));
    assert_eq!(outcome.extracted_data, vec!["$10", "$12"]);

    let missing = test_crawler(0, 1)
        .scrape(&page_url(&server, "/nope"), None)
        .await
        .unwrap();
    assert!(!missing.success);
    assert_eq!(missing.error.as_deref(), Some("HTTP status 404"));
}
