//! HTTP-level behavior: flags, status handling, timeouts and raw calls.

use std::time::Duration;

use iam_backend::{
    ApiFlags, AppCredentials, BackendClient, ClientConfig, ErrorKind, Method, Payload,
};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{TestFixture, envelope};

#[tokio::test]
async fn test_debug_and_force_flags_reach_query() {
    let fixture = TestFixture::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/policy/query"))
        .and(query_param("debug", "true"))
        .and(query_param("force", "true"))
        .respond_with(envelope(0, "ok", json!({"debug": {"steps": []}})))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let client = fixture.client_with_flags(false, ApiFlags::new(true, true));
    let data = client.policy_query(&json!({})).await.unwrap();
    assert!(data.contains_key("debug"));
}

#[tokio::test]
async fn test_non_200_with_envelope() {
    let fixture = TestFixture::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/policy/auth"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 1902000,
            "message": "bad request: subject required",
            "data": null
        })))
        .mount(&fixture.server)
        .await;

    let err = fixture
        .client(false)
        .policy_auth(&json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.code(), Some(1902000));
    assert!(err.message().starts_with("statusCode is 400 not 200"));
    assert!(err.message().contains("bad request: subject required"));
}

#[tokio::test]
async fn test_non_200_plain_body() {
    let fixture = TestFixture::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/model/systems/demo/token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&fixture.server)
        .await;

    let err = fixture.client(true).get_token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.message(), "statusCode is 502 not 200");
    assert_eq!(err.code(), None);
}

#[tokio::test]
async fn test_raw_call_with_typed_result_and_timeout() {
    #[derive(Debug, Deserialize)]
    struct Token {
        token: String,
    }

    let fixture = TestFixture::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/model/systems/demo/token"))
        .respond_with(envelope(0, "ok", json!({"token": "typed"})))
        .mount(&fixture.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(envelope(0, "ok", json!({})).set_delay(Duration::from_secs(2)))
        .mount(&fixture.server)
        .await;

    let client = fixture.client(false);

    let token: Token = client
        .call(
            Method::Get,
            "/api/v1/model/systems/demo/token",
            &Payload::new(),
            Duration::ZERO,
        )
        .await
        .unwrap();
    assert_eq!(token.token, "typed");

    let err = client
        .call::<_, Payload>(Method::Get, "/slow", &Payload::new(), Duration::from_millis(100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on port 1.
    let client = BackendClient::new(
        ClientConfig::builder()
            .host("http://127.0.0.1:1")
            .system("demo")
            .credentials(AppCredentials::new("code", "secret"))
            .build(),
    )
    .unwrap();

    let err = client.ping().await.unwrap_err();
    assert!(err.kind().is_transport());
    assert!(err.message().starts_with("ping fail!"));

    let err = client.policy_get(1).await.unwrap_err();
    assert!(err.kind().is_transport());
}

#[tokio::test]
async fn test_ping_non_200() {
    let fixture = TestFixture::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fixture.server)
        .await;

    let err = fixture.client(false).ping().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.message(), "ping fail! status_code=503");
}
