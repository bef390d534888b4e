//! Common test harness for IAM backend integration tests.

use iam_backend::{ApiFlags, AppCredentials, BackendClient, ClientConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_CODE: &str = "bk_demo";
pub const APP_SECRET: &str = "s3cr3t";
pub const SYSTEM: &str = "demo";

/// Installs a test-writer subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A running mock backend to point clients at.
pub struct TestFixture {
    pub server: MockServer,
}

impl TestFixture {
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn client(&self, gateway: bool) -> BackendClient {
        self.client_with_flags(gateway, ApiFlags::default())
    }

    pub fn client_with_flags(&self, gateway: bool, flags: ApiFlags) -> BackendClient {
        BackendClient::new(
            ClientConfig::builder()
                .host(format!("{}/", self.server.uri()))
                .system(SYSTEM)
                .credentials(AppCredentials::new(APP_CODE, APP_SECRET))
                .gateway(gateway)
                .flags(flags)
                .build(),
        )
        .expect("client config should be valid")
    }

    /// Answers `verb path` with a successful envelope carrying `data`.
    pub async fn respond_ok(&self, verb: &str, endpoint_path: &str, data: Value) {
        Mock::given(method(verb))
            .and(path(endpoint_path))
            .respond_with(envelope(0, "ok", data))
            .mount(&self.server)
            .await;
    }
}

pub fn envelope(code: i64, message: &str, data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": code,
        "message": message,
        "data": data,
    }))
}
