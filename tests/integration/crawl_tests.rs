//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for a wiki and run the full cycle
//! end-to-end: listing pages, content pages, extraction and JSON output.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiki_harvest::config::Config;
use wiki_harvest::crawler::{crawl, run_crawl, HttpFetcher};
use wiki_harvest::output::{JsonOutput, RunReport};
use wiki_harvest::Record;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the mock wiki writing into `data_dir`
fn create_test_config(base_url: &str, data_dir: &Path, max_pages: Option<usize>) -> Config {
    let mut config = Config::for_site(base_url);
    config.site.max_pages = max_pages;
    config.output.data_dir = data_dir.to_string_lossy().to_string();
    config.fetcher.timeout_secs = 5;
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

fn listing_page(links: &[&str], next: Option<&str>) -> String {
    let items: String = links
        .iter()
        .map(|href| format!(r#"<li class="category-page__member"><a href="{}">x</a></li>"#, href))
        .collect();
    let next = next
        .map(|href| format!(r#"<a class="category-page__pagination-next" href="{}">Next</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body><ul>{}</ul>{}</body></html>"#,
        items, next
    )
}

fn character_page(base_url: &str, name: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="page-header__title">{name}</h1>
        <aside class="portable-infobox">
          <img src="{base_url}/images/{name}.png/revision/latest?cb=20200101">
          <div class="pi-item"><h3 class="pi-data-label">Power</h3><div class="pi-data-value">fire</div></div>
        </aside>
        <div id="mw-content-text"><p>{name} is a character used by the integration tests of this harvester.</p></div>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Paths of content pages (anything that is not a listing seed or category)
async fn content_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.url.path().to_string())
        .filter(|p| !p.contains("Category:") && !p.contains("Special:"))
        .collect()
}

fn read_records(path: &Path) -> Vec<Record> {
    serde_json::from_str(&fs::read_to_string(path).expect("records file")).expect("records json")
}

fn read_report(path: &Path) -> RunReport {
    serde_json::from_str(&fs::read_to_string(path).expect("report file")).expect("report json")
}

#[tokio::test]
async fn test_full_harvest_single_listing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/wiki/Category:Characters",
        listing_page(&["/wiki/Category:X", "/wiki/Alice", "/wiki/Bob"], None),
    )
    .await;
    mount_page(&mock_server, "/wiki/Alice", character_page(&base_url, "Alice")).await;
    mount_page(
        &mock_server,
        "/wiki/Bob",
        "<html><body><h1>Bob</h1><p>No image anywhere.</p></body></html>".to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path(), None);
    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher).unwrap());
    let output = JsonOutput::from_config(&config.output);

    let summary = run_crawl(config, fetcher, &output)
        .await
        .expect("harvest should succeed");

    // Exactly one record: Bob has no image, Category:X is never fetched
    let records = read_records(&summary.records.latest);
    assert_eq!(records.len(), 1);

    let alice = &records[0];
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.image_url, format!("{}/images/Alice.png", base_url));
    assert_eq!(alice.attribute_1.as_deref(), Some("Power: fire"));
    assert_eq!(alice.attribute_2, None);
    assert_eq!(alice.page_url, format!("{}/wiki/Alice", base_url));
    assert_eq!(alice.site_url, base_url);
    assert!(alice.description.starts_with("Alice is a character"));

    assert!(!content_paths(&mock_server)
        .await
        .contains(&"/wiki/Category:X".to_string()));

    // Timestamped copy matches the latest file
    assert_eq!(read_records(&summary.records.timestamped), records);

    let report = read_report(&summary.report_path);
    assert_eq!(report.pages_scraped, 2);
    assert_eq!(report.site_url, base_url);
    // The eight other listing seeds are missing on this wiki
    assert_eq!(report.errors_count, 8);
    assert_eq!(summary.pipeline.accepted, 1);
}

#[tokio::test]
async fn test_budget_stops_content_but_not_pagination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The more specific mock goes first so it wins for ?from=F
    Mock::given(method("GET"))
        .and(path("/wiki/Category:Characters"))
        .and(query_param("from", "F"))
        .respond_with(html(listing_page(&["/wiki/F", "/wiki/G"], None)))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/wiki/Category:Characters",
        listing_page(
            &["/wiki/A", "/wiki/B", "/wiki/C", "/wiki/D", "/wiki/E"],
            Some("/wiki/Category:Characters?from=F"),
        ),
    )
    .await;
    for name in ["A", "B", "C", "D", "E", "F", "G"] {
        mount_page(
            &mock_server,
            &format!("/wiki/{}", name),
            character_page(&base_url, &format!("Hero{}", name)),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path(), Some(2));

    let summary = crawl(config).await.expect("harvest should succeed");

    assert_eq!(content_paths(&mock_server).await.len(), 2);
    assert_eq!(summary.report.pages_scraped, 2);
    assert_eq!(summary.pipeline.accepted, 2);

    let paginated = mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .any(|r| r.url.query() == Some("from=F"));
    assert!(paginated, "pagination should be followed after the budget is spent");
}

#[tokio::test]
async fn test_report_written_for_empty_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path(), Some(10));

    let summary = crawl(config).await.expect("an empty run is still a run");

    assert!(read_records(&summary.records.latest).is_empty());

    let report = read_report(&summary.report_path);
    assert_eq!(report.pages_scraped, 0);
    assert_eq!(report.errors_count, 9);
    assert!(report
        .errors
        .iter()
        .all(|e| e.starts_with("Request failed for") && e.ends_with("HTTP 404")));
}

#[tokio::test]
async fn test_non_html_content_is_logged() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/wiki/Category:Characters",
        listing_page(&["/wiki/Data", "/wiki/Alice"], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/wiki/Alice", character_page(&base_url, "Alice")).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path(), None);

    let summary = crawl(config).await.expect("harvest should succeed");

    assert_eq!(summary.pipeline.accepted, 1);
    assert!(summary.report.errors.contains(&format!(
        "Request failed for {}/wiki/Data: Expected HTML, got application/json",
        base_url
    )));
}

#[tokio::test]
async fn test_mirror_copy_written() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/wiki/Category:Heroes",
        listing_page(&["/wiki/Alice"], None),
    )
    .await;
    mount_page(&mock_server, "/wiki/Alice", character_page(&base_url, "Alice")).await;

    let dir = TempDir::new().unwrap();
    let mirror = dir.path().join("frontend").join("public").join("data");
    let mut config = create_test_config(&base_url, &dir.path().join("data"), None);
    config.output.mirror_dir = Some(mirror.to_string_lossy().to_string());

    let summary = crawl(config).await.expect("harvest should succeed");

    let mirror_path = summary.records.mirror.expect("mirror should be written");
    assert!(mirror_path.starts_with(&mirror));
    assert_eq!(read_records(&mirror_path).len(), 1);
}
