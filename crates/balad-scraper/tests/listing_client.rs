//! Integration tests for `ListingClient` and a full aggregation run.
//!
//! Each test stands up a local `wiremock` server so no real network traffic
//! is made.

use std::time::Duration;

use balad_core::PageErrorPolicy;
use serde_json::{json, Value};
use tokio::sync::watch;
use wiremock::matchers::{header, headers, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use balad_scraper::{
    aggregate, ListingClient, PageSource, RunEnd, RunOptions, ScraperError, StopReason,
};

const LISTING_PATH: &str = "/city-tehran/cat-supermarket";

fn test_client(base: &str) -> ListingClient {
    ListingClient::new(base, "tehran", "supermarket", 5, "balad-test/0.1", "fa-IR,fa;q=0.9")
        .expect("failed to build test ListingClient")
}

fn hydration_page(items: &Value, page_count: Option<u32>) -> String {
    let mut data = json!({ "items": items });
    if let Some(count) = page_count {
        data["pageCount"] = json!(count);
    }
    let doc = json!({ "props": { "pageProps": { "data": data } } });
    format!(
        r#"<html><head><script id="__NEXT_DATA__" type="application/json">{doc}</script></head><body></body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    let mock = Mock::given(method("GET")).and(path(LISTING_PATH));
    let mock = if page == 1 {
        mock.and(query_param_is_missing("page"))
    } else {
        mock.and(query_param("page", page.to_string()))
    };
    mock.respond_with(html(body)).mount(server).await;
}

#[tokio::test]
async fn first_page_is_requested_without_query_and_parsed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        hydration_page(
            &json!([
                {"name": "هایپر استار", "telephone": "021-1", "address": "ونک"},
                {"name": "Shop B"}
            ]),
            Some(3),
        ),
    )
    .await;

    let client = test_client(&server.uri());
    let page = client.fetch_page(1).await.expect("page 1");

    assert_eq!(page.page, 1);
    assert_eq!(page.listings.len(), 2);
    assert_eq!(page.listings[0].name, "هایپر استار");
    assert_eq!(page.listings[0].phone, "021-1");
    assert_eq!(page.total_pages, Some(3));
    assert!(page.has_next);
}

#[tokio::test]
async fn later_page_carries_page_query() {
    let server = MockServer::start().await;
    mount_page(&server, 2, hydration_page(&json!([{"name": "X"}]), None)).await;

    let page = test_client(&server.uri()).fetch_page(2).await.expect("page 2");
    assert_eq!(page.page, 2);
    assert_eq!(page.listings[0].name, "X");
}

#[tokio::test]
async fn request_carries_browser_like_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(headers("accept-language", vec!["fa-IR", "fa;q=0.9"]))
        .and(header("user-agent", "balad-test/0.1"))
        .respond_with(html(hydration_page(&json!([{"name": "X"}]), None)))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri()).fetch_page(1).await.expect("page 1");
}

#[tokio::test]
async fn not_found_is_a_distinct_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_page(1).await.unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_page(1).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn page_without_structured_data_reports_every_strategy() {
    let server = MockServer::start().await;
    mount_page(&server, 1, "<html><body>captcha</body></html>".to_string()).await;

    let err = test_client(&server.uri()).fetch_page(1).await.unwrap_err();
    match err {
        ScraperError::NoStructuredData { page, detail } => {
            assert_eq!(page, 1);
            assert!(detail.contains("hydration"), "got {detail}");
            assert!(detail.contains("jsonld"), "got {detail}");
        }
        other => panic!("expected NoStructuredData, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    // Nothing listens on port 9 of localhost in the test environment.
    let err = test_client("http://127.0.0.1:9").fetch_page(1).await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}

#[tokio::test]
async fn full_run_stops_on_empty_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        hydration_page(&json!([{"name": "A", "address": "1"}, {"name": "B", "address": "2"}]), None),
    )
    .await;
    mount_page(&server, 2, hydration_page(&json!([]), None)).await;

    let client = test_client(&server.uri());
    let options = RunOptions {
        max_pages: 30,
        delay: Duration::ZERO,
        on_page_error: PageErrorPolicy::Halt,
    };
    let report = aggregate(&client, &options, watch::channel(false).1).await;

    assert_eq!(report.listings.len(), 2);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.end, RunEnd::Paginated(StopReason::EmptyPage));
}

#[tokio::test]
async fn full_run_skips_a_broken_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, hydration_page(&json!([{"name": "A"}]), Some(3))).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, 3, hydration_page(&json!([{"name": "C"}]), Some(3))).await;

    let client = test_client(&server.uri());
    let options = RunOptions {
        max_pages: 30,
        delay: Duration::ZERO,
        on_page_error: PageErrorPolicy::Skip,
    };
    let report = aggregate(&client, &options, watch::channel(false).1).await;

    let names: Vec<&str> = report.listings.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
    assert_eq!(report.failed_pages, vec![2]);
    assert_eq!(report.end, RunEnd::Paginated(StopReason::LastPage));
}

#[tokio::test]
async fn probe_reports_status_and_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><head><title>Balad</title></head></html>".to_string()))
        .mount(&server)
        .await;

    let report = test_client(&server.uri()).probe().await.expect("probe");
    assert_eq!(report.status, 200);
    assert_eq!(report.title.as_deref(), Some("Balad"));
}
