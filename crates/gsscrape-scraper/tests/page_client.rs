//! Integration tests for `PageClient::fetch_page` and `collect_records`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gsscrape_scraper::{
    collect_records, CollectOptions, PageClient, PageClientSettings, PageRequest, ScraperError,
    StopReason,
};

const API_PATH: &str = "/prdw/store/v1/goods";

/// Builds a `PageClient` pointed at the mock server with no overrides.
fn test_client(server: &MockServer) -> PageClient {
    test_client_with(server, BTreeMap::new(), BTreeMap::new())
}

fn test_client_with(
    server: &MockServer,
    extra_headers: BTreeMap<String, String>,
    extra_params: BTreeMap<String, String>,
) -> PageClient {
    PageClient::new(PageClientSettings {
        base_url: format!("{}{API_PATH}", server.uri()),
        referer: "https://www.gsshop.com/shop/wine/cate.gs?msectid=1548240".to_owned(),
        user_agent: "gsscrape-test/0.1".to_owned(),
        timeout_secs: 5,
        extra_headers,
        extra_params,
    })
    .expect("failed to build test PageClient")
}

fn product(id: &str) -> serde_json::Value {
    json!({
        "goodsNo": id,
        "goodsNm": format!("Liquor {id}"),
        "price": {"sellPrice": 25_000},
        "detailUrl": format!("https://www.gsshop.com/prd/prd.gs?prdid={id}")
    })
}

fn page_request(page: u32, page_size: u32) -> PageRequest {
    PageRequest { page, page_size }
}

fn collect_options(target_count: usize, page_size: u32) -> CollectOptions {
    CollectOptions {
        target_count,
        page_size,
        delay: Duration::ZERO,
        max_pages: None,
    }
}

// ---------------------------------------------------------------------------
// fetch_page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_sends_page_size_and_default_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", "1"))
        .and(query_param("size", "60"))
        .and(header("user-agent", "gsscrape-test/0.1"))
        .and(header(
            "referer",
            "https://www.gsshop.com/shop/wine/cate.gs?msectid=1548240",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"products": [product("1"), product("2")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server)
        .fetch_page(page_request(1, 60))
        .await
        .expect("expected Ok page");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "1");
    assert_eq!(records[0].name, "Liquor 1");
    assert_eq!(records[0].price, 25_000);
    assert_eq!(records[1].url, "https://www.gsshop.com/prd/prd.gs?prdid=2");
}

#[tokio::test]
async fn fetch_page_forwards_extra_params_and_header_overrides() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", "2"))
        .and(query_param("msectid", "1548240"))
        .and(header("referer", "https://www.gsshop.com/"))
        .and(header("cookie", "JSESSIONID=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": [product("7")]})))
        .expect(1)
        .mount(&server)
        .await;

    let headers = BTreeMap::from([
        ("Referer".to_owned(), "https://www.gsshop.com/".to_owned()),
        ("Cookie".to_owned(), "JSESSIONID=abc".to_owned()),
    ]);
    let params = BTreeMap::from([("msectid".to_owned(), "1548240".to_owned())]);

    let records = test_client_with(&server, headers, params)
        .fetch_page(page_request(2, 60))
        .await
        .expect("expected Ok page");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "7");
}

#[tokio::test]
async fn fetch_page_reads_products_nested_under_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"products": [product("9")], "totalCnt": 1}})),
        )
        .mount(&server)
        .await;

    let records = test_client(&server)
        .fetch_page(page_request(1, 60))
        .await
        .expect("expected Ok page");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "9");
}

#[tokio::test]
async fn fetch_page_returns_empty_for_unrecognized_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [product("1")]})))
        .mount(&server)
        .await;

    let records = test_client(&server)
        .fetch_page(page_request(1, 60))
        .await
        .expect("schema drift must not be an error");

    assert!(records.is_empty());
}

#[tokio::test]
async fn fetch_page_propagates_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_page(page_request(1, 60)).await;

    match result {
        Err(ScraperError::UnexpectedStatus { status, url }) => {
            assert_eq!(status, 403);
            assert!(url.contains("page=1"), "url should carry the query: {url}");
        }
        other => panic!("expected ScraperError::UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_page_propagates_deserialize_error_for_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_page(page_request(1, 60)).await;

    assert!(
        matches!(result, Err(ScraperError::Deserialize { .. })),
        "expected ScraperError::Deserialize, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// collect_records over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collect_stops_after_page_two_with_overshoot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", "1"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                product("1"),
                {"goodsNo": "broken", "goodsNm": "No Url", "sellPrice": 100},
                product("2")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"products": [product("3"), product("4")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": [product("5")]})))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = collect_records(&test_client(&server), &collect_options(3, 2))
        .await
        .expect("expected Ok outcome");

    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
    let ids: Vec<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
}

#[tokio::test]
async fn collect_empty_first_page_issues_single_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = collect_records(&test_client(&server), &collect_options(1000, 60))
        .await
        .expect("expected Ok outcome");

    assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.pages_fetched, 1);
}

#[tokio::test]
async fn collect_aborts_when_a_later_page_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": [product("1")]})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = collect_records(&test_client(&server), &collect_options(10, 1)).await;

    match result {
        Err(ScraperError::UnexpectedStatus { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected ScraperError::UnexpectedStatus, got: {other:?}"),
    }
}
