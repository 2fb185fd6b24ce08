use searchsync_cloud::{
    CloudError, CloudSearchConfig, HttpResponse, HttpTransport, Mode, SearchClient,
    SearchOptions, TransportError,
};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server: &MockServer) -> CloudSearchConfig {
    CloudSearchConfig::new("recipes").with_endpoint(server.uri())
}

fn hits(found: u64, start: u64, ids: &[&str]) -> serde_json::Value {
    let hit: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
    json!({
        "rank": "-text_relevance",
        "match-expr": "(label 'fritters')",
        "hits": { "found": found, "start": start, "hit": hit },
        "info": { "rid": "abc", "time-ms": 2, "cpu-time-ms": 0 }
    })
}

// ── Construction ────────────────────────────────────────────────

#[test]
fn client_requires_search_domain() {
    let err = SearchClient::new(CloudSearchConfig::default()).err().unwrap();
    assert!(matches!(err, CloudError::Config(_)));
}

#[test]
fn build_url_uses_computed_host() {
    let client = SearchClient::new(CloudSearchConfig::new("recipes")).unwrap();
    let url = client.build_url("fritters", &SearchOptions::default());
    assert_eq!(
        url.as_str(),
        "http://search-recipes.us-east-1.cloudsearch.amazonaws.com/2011-02-01/search?q=fritters&size=10"
    );
}

// ── Search ──────────────────────────────────────────────────────

#[tokio::test]
async fn search_returns_ids_in_rank_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("q", "fritters"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(2, 0, &["item_9", "item_3"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let results = client.search("fritters", &SearchOptions::default()).await.unwrap();

    let ids: Vec<&str> = results.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["item_9", "item_3"]);
    assert_eq!(results.total_entries(), 2);
    assert_eq!(results.page_size(), 10);
}

#[tokio::test]
async fn search_with_no_hits_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(0, 0, &[])))
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let results = client.search("nothing", &SearchOptions::default()).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(results.total_entries(), 0);
}

#[tokio::test]
async fn search_sends_paging_and_rank() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "20"))
        .and(query_param("rank", "-created_at"))
        .and(query_param("return-fields", "name,price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(21, 20, &["item_1"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let options = SearchOptions::default()
        .page(3)
        .rank(("created_at", "desc"))
        .return_fields(["name", "price"]);
    let results = client.search("x", &options).await.unwrap();
    assert_eq!(results.current_page(), 3);
    assert_eq!(results.offset(), 20);
}

#[tokio::test]
async fn page_size_echoes_request_not_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(50, 0, &["a_1", "a_2"])))
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let results = client
        .search("x", &SearchOptions::default().page_size(25))
        .await
        .unwrap();
    assert_eq!(results.page_size(), 25);
    assert_eq!(results.total_pages(), 2);
}

#[tokio::test]
async fn non_200_is_search_failure_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .respond_with(ResponseTemplate::new(408).set_body_string("Request Timeout"))
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let err = client.search("x", &SearchOptions::default()).await.unwrap_err();
    assert!(err.is_search());
    assert_eq!(err.status(), Some(408));
    assert!(err.to_string().contains("408: Request Timeout"));
}

#[tokio::test]
async fn malformed_body_is_search_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let err = client.search("x", &SearchOptions::default()).await.unwrap_err();
    assert!(err.is_search());
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn transport_failure_keeps_original_error() {
    // Nothing listens on this port.
    let config = CloudSearchConfig::new("recipes").with_endpoint("http://127.0.0.1:9");
    let client = SearchClient::new(config).unwrap();

    let err = client.search("x", &SearchOptions::default()).await.unwrap_err();
    assert!(err.is_search());
    assert_eq!(err.status(), None);
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("HTTP error"));
}

// ── Sandbox ─────────────────────────────────────────────────────

struct CountingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl HttpTransport for CountingTransport {
    async fn get(&self, _url: &Url) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::Other("unexpected call".into()))
    }

    async fn post(
        &self,
        _url: &Url,
        _body: String,
        _headers: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::Other("unexpected call".into()))
    }
}

#[tokio::test]
async fn sandbox_search_makes_no_calls() {
    let transport = Arc::new(CountingTransport {
        calls: AtomicUsize::new(0),
    });
    let config = CloudSearchConfig::new("recipes").with_mode(Mode::Sandbox);
    let client = SearchClient::with_transport(config, transport.clone()).unwrap();

    let results = client.search("fritters", &SearchOptions::default()).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(results.total_entries(), 0);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sandbox_and_production_clients_coexist() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(1, 0, &["item_1"])))
        .expect(1)
        .mount(&server)
        .await;

    let live = SearchClient::new(mock_config(&server)).unwrap();
    let sandbox = SearchClient::new(mock_config(&server).with_mode(Mode::Sandbox)).unwrap();

    assert!(sandbox.search("x", &SearchOptions::default()).await.unwrap().is_empty());
    assert_eq!(live.search("x", &SearchOptions::default()).await.unwrap().len(), 1);
}

// ── Pagination ──────────────────────────────────────────────────

#[tokio::test]
async fn pages_walk_until_total_reached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(5, 0, &["i_1", "i_2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(5, 2, &["i_3", "i_4"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(5, 4, &["i_5"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let mut pages = client.pages("x", SearchOptions::default().page_size(2));
    let ids = pages.collect_ids().await.unwrap();

    let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["i_1", "i_2", "i_3", "i_4", "i_5"]);
    assert!(pages.is_exhausted());
    assert!(pages.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn pages_stop_on_short_page() {
    let server = MockServer::start().await;

    // Server claims more hits than it hands out.
    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(100, 0, &["i_1"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let mut pages = client.pages("x", SearchOptions::default().page_size(10));

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(first.len(), 1);
    assert!(pages.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn pages_restart_from_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(1, 0, &["i_1"])))
        .expect(2)
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let mut pages = client.pages("x", SearchOptions::default());

    assert_eq!(pages.collect_ids().await.unwrap().len(), 1);
    pages.restart();
    assert!(!pages.is_exhausted());
    assert_eq!(pages.collect_ids().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sandbox_pages_are_empty() {
    let config = CloudSearchConfig::new("recipes").with_mode(Mode::Sandbox);
    let client = SearchClient::new(config).unwrap();
    let mut pages = client.pages("x", SearchOptions::default());
    assert!(pages.next_page().await.unwrap().is_none());
    assert!(pages.is_exhausted());
}

#[tokio::test]
async fn pages_with_zero_size_use_default_page_size() {
    let server = MockServer::start().await;

    // Hits come back regardless of the requested size.
    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("size", "10"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(3, 0, &["i_1", "i_2", "i_3"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let mut pages = client.pages("x", SearchOptions::default().page_size(0));

    assert_eq!(pages.collect_ids().await.unwrap().len(), 3);
    assert!(pages.is_exhausted());
}

#[tokio::test]
async fn pages_continue_past_page_with_fewer_hits_than_total_suggests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(4, 0, &["i_1", "i_2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2011-02-01/search"))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(4, 2, &["i_3", "i_4"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(mock_config(&server)).unwrap();
    let mut pages = client.pages("x", SearchOptions::default().page_size(2));

    let first = pages.next_page().await.unwrap().unwrap();
    assert!(!first.is_last_page());
    let second = pages.next_page().await.unwrap().unwrap();
    assert!(second.is_last_page());
    assert!(pages.next_page().await.unwrap().is_none());
}
