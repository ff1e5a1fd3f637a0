//! Tests for the GraphQL transport

use super::*;
use crate::config::TapConfig;
use crate::error::Error;
use crate::query::{me_query, GraphQlRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> TapConfig {
    TapConfig::new("secret-token")
        .with_api_url(format!("{}/v2", server.uri()))
        .with_retries(2, 0)
}

fn client_for(server: &MockServer) -> GraphQlClient {
    GraphQlClient::from_config(&config_for(server)).unwrap()
}

#[tokio::test]
async fn test_posts_query_with_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(header("Authorization", "secret-token"))
        .and(body_partial_json(json!({"variables": {"ids": [1]}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"boards": [{"id": "1"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GraphQlRequest::new("query ($ids: [ID!]) { boards(ids: $ids) { id } }")
        .variable("ids", json!([1]));
    let body = client_for(&server).execute(&request).await.unwrap();

    assert_eq!(body["data"]["boards"][0]["id"], "1");
}

#[tokio::test]
async fn test_optional_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("API-Version", "2024-01"))
        .and(header("User-Agent", "tap-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"me": {}}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.api_version = Some("2024-01".to_string());
    config.user_agent = Some("tap-tests/1.0".to_string());

    let client = GraphQlClient::from_config(&config).unwrap();
    client.execute(&me_query()).await.unwrap();
}

#[tokio::test]
async fn test_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"me": {"id": 1}}})))
        .mount(&server)
        .await;

    let body = client_for(&server).execute(&me_query()).await.unwrap();
    assert_eq!(body["data"]["me"]["id"], 1);
}

#[tokio::test]
async fn test_rate_limited_until_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server).execute(&me_query()).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { attempts: 3 }));
}

#[tokio::test]
async fn test_server_error_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server).execute(&me_query()).await.unwrap_err();
    match err {
        Error::MaxRetriesExceeded { max_retries, last } => {
            assert_eq!(max_retries, 2);
            assert!(matches!(*last, Error::HttpStatus { status: 500, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Not Authenticated"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).execute(&me_query()).await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Not Authenticated");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_graphql_errors_fail_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Field 'bogus' doesn't exist on type 'Board'"}],
            "account_id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).execute(&me_query()).await.unwrap_err();
    assert!(matches!(err, Error::GraphQl { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).execute(&me_query()).await.unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_retried_then_fails() {
    let config = TapConfig::new("token")
        .with_api_url("http://127.0.0.1:1/v2")
        .with_retries(1, 0);
    let client = GraphQlClient::from_config(&config).unwrap();

    let err = client.execute(&me_query()).await.unwrap_err();
    match err {
        Error::MaxRetriesExceeded { max_retries, last } => {
            assert_eq!(max_retries, 1);
            assert!(matches!(*last, Error::Http(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"me": {}}}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut config = config_for(&server).with_retries(1, 0);
    config.request_timeout_secs = 1;
    let client = GraphQlClient::from_config(&config).unwrap();

    let err = client.execute(&me_query()).await.unwrap_err();
    match err {
        Error::MaxRetriesExceeded { last, .. } => {
            assert!(matches!(*last, Error::Timeout { timeout_ms: 1000 }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_client_from_config() {
    let mut config = TapConfig::new("token");
    config.requests_per_minute = Some(60);

    let client = GraphQlClient::from_config(&config).unwrap();
    assert!(client.has_rate_limiter());
    assert_eq!(client.endpoint().as_str(), "https://api.monday.com/v2");
}

#[test]
fn test_invalid_token_header() {
    let config = TapConfig::new("bad\ntoken");
    let err = GraphQlClient::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("auth_token"));
}
