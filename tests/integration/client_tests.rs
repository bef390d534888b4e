//! End-to-end client workflows.

use std::sync::{Arc, Mutex};

use iam_backend::metrics::RequestRecord;
use iam_backend::{Endpoint, ErrorKind, IamBackend, Method};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{APP_CODE, APP_SECRET, TestFixture, envelope};

async fn authorize(backend: &dyn IamBackend, user: &str) -> bool {
    let body = json!({
        "system": "demo",
        "subject": {"type": "user", "id": user},
        "action": {"id": "view"},
        "resources": [{"system": "demo", "type": "host", "id": "1"}],
    });
    backend
        .policy_auth(&body)
        .await
        .ok()
        .and_then(|data| data.get("allowed").and_then(|v| v.as_bool()))
        .unwrap_or(false)
}

#[tokio::test]
async fn test_policy_workflow() {
    let fixture = TestFixture::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&fixture.server)
        .await;
    fixture
        .respond_ok("GET", "/api/v1/model/systems/demo/token", json!({"token": "tk"}))
        .await;
    fixture
        .respond_ok(
            "POST",
            "/api/v1/policy/query",
            json!({"op": "in", "field": "host.id", "value": ["1", "2"]}),
        )
        .await;
    fixture
        .respond_ok(
            "POST",
            "/api/v1/policy/auth_by_resources",
            json!({"host,1": true, "host,2": false}),
        )
        .await;
    fixture
        .respond_ok(
            "GET",
            "/api/v1/systems/demo/policies",
            json!({
                "metadata": {"system": "demo"},
                "count": 2,
                "results": [{"id": 11}, {"id": 12}]
            }),
        )
        .await;
    fixture
        .respond_ok(
            "GET",
            "/api/v1/systems/demo/policies/-/subjects",
            json!([{"id": 11, "subject": {"type": "user", "id": "admin"}}]),
        )
        .await;

    let client = fixture.client(false);

    client.ping().await.unwrap();
    assert_eq!(client.get_token().await.unwrap(), "tk");

    let expr = client.policy_query(&json!({"system": "demo"})).await.unwrap();
    assert_eq!(expr["op"], json!("in"));

    let decisions = client
        .policy_auth_by_resources(&json!({"system": "demo"}))
        .await
        .unwrap();
    assert_eq!(decisions["host,1"], json!(true));
    assert_eq!(decisions["host,2"], json!(false));

    let page = client
        .policy_list(&json!({"action_id": "view", "page": 1, "page_size": 100}))
        .await
        .unwrap();
    let ids: Vec<i64> = page["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![11, 12]);

    let subjects = client.policy_subjects(&ids).await.unwrap();
    assert_eq!(subjects[0]["subject"]["id"], json!("admin"));
}

#[tokio::test]
async fn test_direct_mode_headers() {
    let fixture = TestFixture::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/policy/auth"))
        .and(header("X-BK-APP-CODE", APP_CODE))
        .and(header("X-BK-APP-SECRET", APP_SECRET))
        .and(header("X-Bk-IAM-Version", "1"))
        .respond_with(envelope(0, "ok", json!({"allowed": true})))
        .expect(1)
        .mount(&fixture.server)
        .await;

    assert!(authorize(&fixture.client(false), "admin").await);
}

#[tokio::test]
async fn test_gateway_mode_header() {
    let fixture = TestFixture::start().await;
    let authorization = json!({"bk_app_code": APP_CODE, "bk_app_secret": APP_SECRET}).to_string();

    Mock::given(method("POST"))
        .and(path("/api/v1/policy/auth"))
        .and(header("X-Bkapi-Authorization", authorization.as_str()))
        .respond_with(envelope(0, "ok", json!({"allowed": true})))
        .expect(1)
        .mount(&fixture.server)
        .await;

    assert!(authorize(&fixture.client(true), "admin").await);
}

#[tokio::test]
async fn test_denied_and_errors_read_as_not_allowed() {
    let fixture = TestFixture::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/policy/auth"))
        .respond_with(envelope(1901401, "app unauthorized", json!(null)))
        .mount(&fixture.server)
        .await;

    let client = fixture.client(false);
    assert!(!authorize(&client, "admin").await);

    let err = client.policy_auth(&json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.code(), Some(1901401));
    assert_eq!(
        err.message(),
        "response body.code: 1901401, message:app unauthorized"
    );
}

#[tokio::test]
async fn test_v2_endpoints_with_other_system() {
    let fixture = TestFixture::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/policy/systems/bk_cmdb/query_by_actions/"))
        .respond_with(envelope(
            0,
            "ok",
            json!([{
                "action": {"id": "view"},
                "condition": {"op": "any", "field": "", "value": []}
            }]),
        ))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let list = fixture
        .client(false)
        .v2_policy_query_by_actions("bk_cmdb", &json!({"actions": [{"id": "view"}]}))
        .await
        .unwrap();
    assert_eq!(list[0]["condition"]["op"], json!("any"));
}

#[tokio::test]
async fn test_apply_url_and_subjects_query() {
    let fixture = TestFixture::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/systems/demo/policies/-/subjects"))
        .and(query_param("ids", "7"))
        .respond_with(envelope(0, "ok", json!([])))
        .expect(1)
        .mount(&fixture.server)
        .await;
    fixture
        .respond_ok("POST", "/api/v1/open/application/", json!({"url": "http://iam/apply?id=1"}))
        .await;

    let client = fixture.client(true);
    assert!(client.policy_subjects(&[7]).await.unwrap().is_empty());
    assert_eq!(
        client.get_apply_url(&json!({"system": "demo"})).await.unwrap(),
        "http://iam/apply?id=1"
    );
}

#[tokio::test]
async fn test_metrics_callback_sees_every_request() {
    let fixture = TestFixture::start().await;
    fixture
        .respond_ok("GET", "/api/v1/systems/demo/policies/5", json!({"id": 5}))
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/systems/demo/policies/6"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&fixture.server)
        .await;

    let seen: Arc<Mutex<Vec<RequestRecord>>> = Arc::default();
    let sink = seen.clone();
    let client = fixture
        .client(false)
        .with_metrics(Arc::new(move |record: &RequestRecord| {
            sink.lock().unwrap().push(record.clone());
        }));

    client.policy_get(5).await.unwrap();
    assert_eq!(client.policy_get(6).await.unwrap_err().kind(), ErrorKind::HttpStatus);

    let records = seen.lock().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].service, "IAMBackend");
    assert_eq!(records[0].method, Method::Get);
    assert_eq!(records[0].endpoint, Some(Endpoint::PolicyGet));
    assert_eq!(records[0].path, "/api/v1/systems/demo/policies/5");
    assert!(records[0].is_success());
    assert_eq!(records[1].status, Some(500));
    assert_eq!(records[1].error, Some(ErrorKind::HttpStatus));
}
