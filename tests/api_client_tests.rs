//! Integration tests for the request dispatcher.
//!
//! These tests run [`ApiClient`] with the default reqwest transport against
//! a local mock server and verify the request that goes out on the wire as
//! well as the normalized result that comes back.

use rest_dispatch::auth::{BasicAuth, BearerAuth, CompositeAuth, HeaderAuth, NoAuth};
use rest_dispatch::clients::{header_value, ReqwestTransport};
use rest_dispatch::{
    ApiClient, BaseUrl, ClientConfig, DispatchError, HttpMethod, RequestSpec, ResponseData,
};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a config pointing at the mock server with an explicit token.
fn create_test_config(server: &MockServer, include_raw: bool) -> ClientConfig {
    ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .explicit_credential("token", "test-token")
        .user_agent("test-client", "0.9.0")
        .include_raw(include_raw)
        .build_with(|_| None)
        .unwrap()
}

// ============================================================================
// Request Assembly
// ============================================================================

#[tokio::test]
async fn test_get_request_sends_default_and_auth_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "test-client/0.9.0"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), BearerAuth::new("token")).unwrap();
    let result = client.get("/items").await.unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(result.data, ResponseData::Json(json!({"items": []})));
    assert!(result.raw.is_none());
}

#[tokio::test]
async fn test_query_parameters_are_encoded_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("a", "1"))
        .and(query_param("b", "x y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let request = RequestSpec::builder(HttpMethod::Get, "/items")
        .query_param("a", "1")
        .query_param("b", "x y")
        .build();

    let result = client.api_call(request).await.unwrap();
    assert_eq!(result.status_code, 200);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("a=1&b=x%20y"));
}

#[tokio::test]
async fn test_json_payload_round_trip() {
    let server = MockServer::start().await;
    let payload = json!({"name": "widget", "tags": ["a", "b"], "price": 9.5});

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("content-type", "application/json"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let result = client.post("/items", payload.clone()).await.unwrap();

    assert_eq!(result.status_code, 201);
    assert_eq!(result.data, ResponseData::Json(payload));
}

#[tokio::test]
async fn test_form_content_type_override_encodes_form_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("name=a%20b&id=5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let request = RequestSpec::builder(HttpMethod::Post, "/login")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .payload(json!({"name": "a b", "id": 5}))
        .build();

    let result = client.api_call(request).await.unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn test_pre_serialized_payload_is_sent_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/doc"))
        .and(header("content-type", "application/xml"))
        .and(body_string("<doc id=\"1\"/>"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let request = RequestSpec::builder(HttpMethod::Put, "/doc")
        .header("content-type", "application/xml")
        .payload("<doc id=\"1\"/>")
        .build();

    let result = client.api_call(request).await.unwrap();
    assert_eq!(result.status_code, 204);
    assert_eq!(result.data, ResponseData::Text(String::new()));
}

#[tokio::test]
async fn test_custom_header_auth_pair() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("x-api-key", "test-token"))
        .and(header("x-client", "cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .explicit_credential("token", "test-token")
        .explicit_credential("client", "cli")
        .build_with(|_| None)
        .unwrap();
    let auth = CompositeAuth::new()
        .with(HeaderAuth::new("X-Api-Key", "token"))
        .with(HeaderAuth::new("X-Client", "client"));

    let client = ApiClient::new(config, auth).unwrap();
    let result = client.get("/me").await.unwrap();
    assert_eq!(result.status_code, 200);
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .explicit_credential("user", "user")
        .explicit_credential("pass", "pass")
        .build_with(|_| None)
        .unwrap();

    let client = ApiClient::new(config, BasicAuth::new("user", "pass")).unwrap();
    let result = client.get("/secure").await.unwrap();
    assert_eq!(result.status_code, 200);
}

#[tokio::test]
async fn test_client_with_caller_supplied_reqwest_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    let client = ApiClient::with_transport(
        create_test_config(&server, false),
        BearerAuth::new("token"),
        ReqwestTransport::from_client(http),
    );

    let result = client.get("/ping").await.unwrap();
    assert_eq!(result.data, ResponseData::Text("pong".to_string()));
}

// ============================================================================
// Response Normalization
// ============================================================================

#[tokio::test]
async fn test_non_2xx_status_is_returned_as_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": "Not Found"}))
                .insert_header("x-request-id", "req-42"),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let result = client.get("/missing").await.unwrap();

    assert_eq!(result.status_code, 404);
    assert!(!result.is_success());
    assert_eq!(result.request_id(), Some("req-42"));
    assert_eq!(result.data.as_json().unwrap()["error"], "Not Found");
}

#[tokio::test]
async fn test_text_response_is_kept_as_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let result = client.get("/health").await.unwrap();

    assert_eq!(result.data, ResponseData::Text("OK".to_string()));
    assert!(result.parse_error.is_none());
}

#[tokio::test]
async fn test_malformed_json_response_reports_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let result = client.get("/broken").await.unwrap();

    assert_eq!(result.status_code, 500);
    assert_eq!(result.data, ResponseData::Text("{not json".to_string()));
    assert!(result.parse_error.is_some());
}

#[tokio::test]
async fn test_typed_response_decoding() {
    #[derive(Debug, Deserialize)]
    struct Item {
        id: u64,
        name: String,
    }

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "widget"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let item: Item = client.get("/items/7").await.unwrap().json().unwrap();

    assert_eq!(item.id, 7);
    assert_eq!(item.name, "widget");
}

// ============================================================================
// Raw Diagnostics
// ============================================================================

#[tokio::test]
async fn test_raw_block_matches_dispatched_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let client =
        ApiClient::new(create_test_config(&server, true), BearerAuth::new("token")).unwrap();
    let request = RequestSpec::builder(HttpMethod::Post, "/items")
        .query_param("dry_run", true)
        .payload(json!({"name": "widget"}))
        .build();

    let result = client.api_call(request).await.unwrap();
    let raw = result.raw.expect("raw block should be present");

    let expected_url = format!("{}/items?dry_run=true", server.uri());
    assert_eq!(raw.request.url, expected_url);
    assert_eq!(raw.request.method, HttpMethod::Post);
    assert_eq!(raw.request.body.as_deref(), Some(r#"{"name":"widget"}"#));
    assert_eq!(
        header_value(&raw.request.headers, "Authorization"),
        Some("Bearer test-token")
    );
    assert_eq!(raw.response.status, 201);
    assert_eq!(raw.response.body, r#"{"id":1}"#);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.as_str(), expected_url);
}

#[tokio::test]
async fn test_raw_block_absent_when_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    for path in ["/a", "/b?x=1", "/c"] {
        let result = client.get(path).await.unwrap();
        assert!(result.raw.is_none());
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[tokio::test]
async fn test_encoding_error_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();
    let request = RequestSpec::builder(HttpMethod::Post, "/form")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .payload(json!(["not", "a", "mapping"]))
        .build();

    let result = client.api_call(request).await;
    assert!(matches!(result, Err(DispatchError::Encoding(_))));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    // Reserve a port, then free it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(format!("http://127.0.0.1:{port}")).unwrap())
        .include_raw(true)
        .build_with(|_| None)
        .unwrap();

    let client = ApiClient::new(config, NoAuth).unwrap();
    let result = client.get("/items").await;

    assert!(matches!(result, Err(DispatchError::Transport(_))));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(8)
        .mount(&server)
        .await;

    let client = ApiClient::new(create_test_config(&server, false), NoAuth).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.get(format!("/items/{i}")).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.status_code, 200);
    }
}
