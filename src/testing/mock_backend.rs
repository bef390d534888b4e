//! MockBackend for testing without a server.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{BackendFuture, IamBackend};
use crate::transport::Envelope;
use crate::types::{Endpoint, Payload, join_ids, payload_str};
use crate::{Error, ErrorKind};

/// A recorded call against a [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// The operation that was invoked.
    pub endpoint: Endpoint,
    /// The system argument of v2 operations.
    pub system: Option<String>,
    /// The request body or query, `null` for operations without one.
    pub body: Value,
}

#[derive(Debug, Clone)]
enum Canned {
    Envelope(Envelope),
    Error(ErrorKind, String),
}

/// An in-process [`IamBackend`] answering from canned responses.
///
/// Responses are configured per [`Endpoint`] as the envelope the server
/// would return, so non-zero codes and malformed `data` fail exactly like
/// they do against the real backend. An endpoint without a response fails
/// with [`ErrorKind::Transport`].
///
/// ```rust
/// use iam_backend::testing::MockBackend;
/// use iam_backend::{Endpoint, IamBackend};
/// use serde_json::json;
///
/// let mock = MockBackend::new()
///     .with_data(Endpoint::GetToken, json!({"token": "abc"}))
///     .with_envelope(Endpoint::PolicyGet, 1902404, "policy not found");
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// rt.block_on(async {
///     assert_eq!(mock.get_token().await.unwrap(), "abc");
///     assert!(mock.policy_get(1).await.is_err());
/// });
/// assert_eq!(mock.call_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<HashMap<Endpoint, Canned>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockBackend {
    /// Creates a mock with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `endpoint` with a successful envelope carrying `data`.
    #[must_use]
    pub fn with_data(self, endpoint: Endpoint, data: Value) -> Self {
        self.responses.lock().insert(
            endpoint,
            Canned::Envelope(Envelope {
                code: 0,
                message: "ok".to_string(),
                data: Some(data),
            }),
        );
        self
    }

    /// Answers `endpoint` with an envelope carrying a non-zero `code`.
    #[must_use]
    pub fn with_envelope(self, endpoint: Endpoint, code: i64, message: impl Into<String>) -> Self {
        self.responses.lock().insert(
            endpoint,
            Canned::Envelope(Envelope {
                code,
                message: message.into(),
                data: Some(Value::Null),
            }),
        );
        self
    }

    /// Fails `endpoint` with an error of the given kind.
    #[must_use]
    pub fn with_error(
        self,
        endpoint: Endpoint,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        self.responses
            .lock()
            .insert(endpoint, Canned::Error(kind, message.into()));
        self
    }

    /// Returns every call made so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the number of calls made to `endpoint`.
    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Clears recorded calls. Configured responses are kept.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn respond<R>(&self, endpoint: Endpoint, system: Option<&str>, body: Value) -> Result<R, Error>
    where
        R: DeserializeOwned + Default,
    {
        self.calls.lock().push(MockCall {
            endpoint,
            system: system.map(str::to_string),
            body,
        });

        let canned = self.responses.lock().get(&endpoint).cloned();
        match canned {
            Some(Canned::Envelope(envelope)) => {
                let data: Option<R> = envelope.decode()?;
                Ok(data.unwrap_or_default())
            }
            Some(Canned::Error(kind, message)) => Err(Error::new(kind, message)),
            None => Err(Error::new(
                ErrorKind::Transport,
                format!("no response configured for {}", endpoint),
            )),
        }
    }

    fn respond_str(&self, endpoint: Endpoint, body: Value, field: &str) -> Result<String, Error> {
        let data: Payload = self.respond(endpoint, None, body)?;
        Ok(payload_str(&data, field)?.to_string())
    }

    fn ready<'a, T: Send + 'a>(result: Result<T, Error>) -> BackendFuture<'a, T> {
        Box::pin(async move { result })
    }
}

impl IamBackend for MockBackend {
    fn ping(&self) -> BackendFuture<'_, ()> {
        self.calls.lock().push(MockCall {
            endpoint: Endpoint::Ping,
            system: None,
            body: Value::Null,
        });
        let result = match self.responses.lock().get(&Endpoint::Ping) {
            Some(Canned::Error(kind, message)) => Err(Error::new(*kind, message.clone())),
            _ => Ok(()),
        };
        Self::ready(result)
    }

    fn get_token(&self) -> BackendFuture<'_, String> {
        Self::ready(self.respond_str(Endpoint::GetToken, Value::Null, "token"))
    }

    fn policy_query<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Self::ready(self.respond(Endpoint::PolicyQuery, None, body.clone()))
    }

    fn v2_policy_query<'a>(
        &'a self,
        system: &'a str,
        body: &'a Value,
    ) -> BackendFuture<'a, Payload> {
        Self::ready(self.respond(Endpoint::V2PolicyQuery, Some(system), body.clone()))
    }

    fn policy_query_by_actions<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Vec<Payload>> {
        Self::ready(self.respond(Endpoint::PolicyQueryByActions, None, body.clone()))
    }

    fn v2_policy_query_by_actions<'a>(
        &'a self,
        system: &'a str,
        body: &'a Value,
    ) -> BackendFuture<'a, Vec<Payload>> {
        Self::ready(self.respond(
            Endpoint::V2PolicyQueryByActions,
            Some(system),
            body.clone(),
        ))
    }

    fn policy_auth<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Self::ready(self.respond(Endpoint::PolicyAuth, None, body.clone()))
    }

    fn v2_policy_auth<'a>(
        &'a self,
        system: &'a str,
        body: &'a Value,
    ) -> BackendFuture<'a, Payload> {
        Self::ready(self.respond(Endpoint::V2PolicyAuth, Some(system), body.clone()))
    }

    fn policy_auth_by_resources<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Self::ready(self.respond(Endpoint::PolicyAuthByResources, None, body.clone()))
    }

    fn policy_auth_by_actions<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Self::ready(self.respond(Endpoint::PolicyAuthByActions, None, body.clone()))
    }

    fn policy_get(&self, policy_id: i64) -> BackendFuture<'_, Payload> {
        let body = serde_json::json!({ "id": policy_id });
        Self::ready(self.respond(Endpoint::PolicyGet, None, body))
    }

    fn policy_list<'a>(&'a self, query: &'a Value) -> BackendFuture<'a, Payload> {
        Self::ready(self.respond(Endpoint::PolicyList, None, query.clone()))
    }

    fn policy_subjects<'a>(&'a self, policy_ids: &'a [i64]) -> BackendFuture<'a, Vec<Payload>> {
        let body = serde_json::json!({ "ids": join_ids(policy_ids) });
        Self::ready(self.respond(Endpoint::PolicySubjects, None, body))
    }

    fn get_apply_url<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, String> {
        Self::ready(self.respond_str(Endpoint::GetApplyUrl, body.clone(), "url"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_canned_data() {
        let mock = MockBackend::new()
            .with_data(Endpoint::PolicyAuth, json!({"allowed": true}))
            .with_data(Endpoint::GetApplyUrl, json!({"url": "http://iam/apply"}));

        let auth = mock.policy_auth(&json!({"system": "demo"})).await.unwrap();
        assert_eq!(auth["allowed"], json!(true));
        assert_eq!(mock.get_apply_url(&json!({})).await.unwrap(), "http://iam/apply");
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_fails() {
        let mock = MockBackend::new();
        let err = mock.policy_query(&json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.message().contains("policy_query"));
    }

    #[tokio::test]
    async fn test_envelope_code_is_application_error() {
        let mock = MockBackend::new().with_envelope(Endpoint::PolicyGet, 1902404, "not found");
        let err = mock.policy_get(9).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(err.code(), Some(1902404));
    }

    #[tokio::test]
    async fn test_canned_error() {
        let mock = MockBackend::new().with_error(Endpoint::Ping, ErrorKind::Connection, "refused");
        assert_eq!(mock.ping().await.unwrap_err().kind(), ErrorKind::Connection);
    }

    #[tokio::test]
    async fn test_ping_succeeds_by_default() {
        assert!(MockBackend::new().ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_null_data_is_empty() {
        let mock = MockBackend::new().with_data(Endpoint::PolicySubjects, Value::Null);
        assert!(mock.policy_subjects(&[1]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_field_errors() {
        let mock = MockBackend::new().with_data(Endpoint::GetToken, json!({"token": 1}));
        assert_eq!(mock.get_token().await.unwrap_err().kind(), ErrorKind::InvalidField);

        let mock = MockBackend::new().with_data(Endpoint::GetToken, json!({}));
        assert_eq!(mock.get_token().await.unwrap_err().kind(), ErrorKind::MissingField);
    }

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockBackend::new()
            .with_data(Endpoint::V2PolicyAuth, json!({}))
            .with_data(Endpoint::PolicySubjects, json!([]));

        mock.v2_policy_auth("cmdb", &json!({"a": 1})).await.unwrap();
        mock.policy_subjects(&[4, 5]).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].endpoint, Endpoint::V2PolicyAuth);
        assert_eq!(calls[0].system.as_deref(), Some("cmdb"));
        assert_eq!(calls[0].body, json!({"a": 1}));
        assert_eq!(calls[1].body, json!({"ids": "4,5"}));
        assert_eq!(mock.calls_to(Endpoint::PolicySubjects), 1);

        mock.reset();
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockBackend::new();
        let clone = mock.clone().with_data(Endpoint::GetToken, json!({"token": "t"}));

        assert_eq!(mock.get_token().await.unwrap(), "t");
        assert_eq!(clone.call_count(), 1);
    }

    #[tokio::test]
    async fn test_as_trait_object() {
        let backend: Box<dyn IamBackend> =
            Box::new(MockBackend::new().with_data(Endpoint::PolicyList, json!({"count": 0})));
        let page = backend.policy_list(&json!({"page": 1})).await.unwrap();
        assert_eq!(page["count"], json!(0));
    }
}
