//! Tests for the Tavily search client against a mock HTTP server.

use dox_agent::{AppError, SearchClient, TavilySearchClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TavilySearchClient {
    TavilySearchClient::with_base_url(server.uri(), "test-key".to_string(), 5)
}

#[tokio::test]
async fn test_search_parses_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(serde_json::json!({
            "query": "rust language",
            "max_results": 5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"title": "Rust", "url": "https://rust-lang.org", "content": "A language"},
                {"title": "Rust Book", "url": "https://doc.rust-lang.org/book"}
            ]
        })))
        .mount(&server)
        .await;

    let hits = client_for(&server).search("rust language").await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["title"], "Rust");
}

#[tokio::test]
async fn test_search_missing_results_field_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let hits = client_for(&server).search("anything").await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_search_error_status_maps_to_search_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("q").await.unwrap_err();

    assert!(matches!(err, AppError::Search(_)));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_identical_queries_hit_the_server_twice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.search("same").await.unwrap();
    client.search("same").await.unwrap();
    // expectation verified on MockServer drop
}
