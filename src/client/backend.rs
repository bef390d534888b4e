//! IamBackend trait for dependency injection.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use super::BackendClient;
use crate::Error;
use crate::types::Payload;

/// Future returned by [`IamBackend`] methods.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// Object-safe view of the IAM backend operations.
///
/// Code that talks to the backend can take `&dyn IamBackend` and receive a
/// [`BackendClient`] in production or a
/// [`MockBackend`](crate::testing::MockBackend) in tests.
///
/// ```rust
/// use iam_backend::{Error, IamBackend};
/// use serde_json::json;
///
/// async fn can_view(backend: &dyn IamBackend, user: &str) -> Result<bool, Error> {
///     let body = json!({
///         "system": "demo",
///         "subject": {"type": "user", "id": user},
///         "action": {"id": "view"},
///         "resources": [],
///     });
///     let data = backend.policy_auth(&body).await?;
///     Ok(data.get("allowed").and_then(|v| v.as_bool()).unwrap_or(false))
/// }
/// ```
pub trait IamBackend: Send + Sync {
    /// Checks that the backend is reachable.
    fn ping(&self) -> BackendFuture<'_, ()>;

    /// Returns the system's callback token.
    fn get_token(&self) -> BackendFuture<'_, String>;

    /// Queries the policy of one action.
    fn policy_query<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload>;

    /// Queries the policy of one action in `system`.
    fn v2_policy_query<'a>(&'a self, system: &'a str, body: &'a Value)
    -> BackendFuture<'a, Payload>;

    /// Queries the policies of several actions.
    fn policy_query_by_actions<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Vec<Payload>>;

    /// Queries the policies of several actions in `system`.
    fn v2_policy_query_by_actions<'a>(
        &'a self,
        system: &'a str,
        body: &'a Value,
    ) -> BackendFuture<'a, Vec<Payload>>;

    /// Asks for an authorization decision.
    fn policy_auth<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload>;

    /// Asks for an authorization decision in `system`.
    fn v2_policy_auth<'a>(&'a self, system: &'a str, body: &'a Value)
    -> BackendFuture<'a, Payload>;

    /// Authorizes one action against several resources.
    fn policy_auth_by_resources<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload>;

    /// Authorizes several actions against one resource.
    fn policy_auth_by_actions<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload>;

    /// Returns one policy.
    fn policy_get(&self, policy_id: i64) -> BackendFuture<'_, Payload>;

    /// Lists policies, `query` being sent as the query string.
    fn policy_list<'a>(&'a self, query: &'a Value) -> BackendFuture<'a, Payload>;

    /// Returns the subject of each listed policy.
    fn policy_subjects<'a>(&'a self, policy_ids: &'a [i64]) -> BackendFuture<'a, Vec<Payload>>;

    /// Generates a permission application URL.
    fn get_apply_url<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, String>;
}

impl IamBackend for BackendClient {
    fn ping(&self) -> BackendFuture<'_, ()> {
        Box::pin(BackendClient::ping(self))
    }

    fn get_token(&self) -> BackendFuture<'_, String> {
        Box::pin(BackendClient::get_token(self))
    }

    fn policy_query<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Box::pin(BackendClient::policy_query(self, body))
    }

    fn v2_policy_query<'a>(
        &'a self,
        system: &'a str,
        body: &'a Value,
    ) -> BackendFuture<'a, Payload> {
        Box::pin(BackendClient::v2_policy_query(self, system, body))
    }

    fn policy_query_by_actions<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Vec<Payload>> {
        Box::pin(BackendClient::policy_query_by_actions(self, body))
    }

    fn v2_policy_query_by_actions<'a>(
        &'a self,
        system: &'a str,
        body: &'a Value,
    ) -> BackendFuture<'a, Vec<Payload>> {
        Box::pin(BackendClient::v2_policy_query_by_actions(self, system, body))
    }

    fn policy_auth<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Box::pin(BackendClient::policy_auth(self, body))
    }

    fn v2_policy_auth<'a>(
        &'a self,
        system: &'a str,
        body: &'a Value,
    ) -> BackendFuture<'a, Payload> {
        Box::pin(BackendClient::v2_policy_auth(self, system, body))
    }

    fn policy_auth_by_resources<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Box::pin(BackendClient::policy_auth_by_resources(self, body))
    }

    fn policy_auth_by_actions<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, Payload> {
        Box::pin(BackendClient::policy_auth_by_actions(self, body))
    }

    fn policy_get(&self, policy_id: i64) -> BackendFuture<'_, Payload> {
        Box::pin(BackendClient::policy_get(self, policy_id))
    }

    fn policy_list<'a>(&'a self, query: &'a Value) -> BackendFuture<'a, Payload> {
        Box::pin(BackendClient::policy_list(self, query))
    }

    fn policy_subjects<'a>(&'a self, policy_ids: &'a [i64]) -> BackendFuture<'a, Vec<Payload>> {
        Box::pin(BackendClient::policy_subjects(self, policy_ids))
    }

    fn get_apply_url<'a>(&'a self, body: &'a Value) -> BackendFuture<'a, String> {
        Box::pin(BackendClient::get_apply_url(self, body))
    }
}
