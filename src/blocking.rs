//! Blocking API over [`crate::BackendClient`].
//!
//! Every method runs the async call to completion on a runtime owned by the
//! client. Do not call these methods from inside an async runtime; use the
//! async client there instead.
//!
//! ```rust,ignore
//! use iam_backend::blocking::BackendClient;
//! use iam_backend::{AppCredentials, ClientConfig};
//!
//! let client = BackendClient::new(
//!     ClientConfig::builder()
//!         .host("http://iam.example.com")
//!         .system("demo")
//!         .credentials(AppCredentials::new("bk_demo", "secret"))
//!         .build(),
//! )?;
//! let token = client.get_token()?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tokio::runtime::Runtime;

use crate::Error;
use crate::config::ClientConfig;
use crate::metrics::MetricsCallback;
use crate::types::{Method, Payload};

/// Blocking client for the IAM backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    inner: crate::BackendClient,
    runtime: Arc<Runtime>,
}

impl BackendClient {
    /// Creates a client and its single-threaded runtime.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::configuration(format!("failed to create runtime: {}", e)).with_source(e)
            })?;

        Ok(Self {
            inner: crate::BackendClient::new(config)?,
            runtime: Arc::new(runtime),
        })
    }

    /// Returns a client that reports every request to `metrics`.
    #[must_use]
    pub fn with_metrics(self, metrics: Arc<dyn MetricsCallback>) -> Self {
        Self {
            inner: self.inner.with_metrics(metrics),
            runtime: self.runtime,
        }
    }

    /// Returns the async client this wraps.
    pub fn as_async(&self) -> &crate::BackendClient {
        &self.inner
    }

    /// See [`crate::BackendClient::call`].
    pub fn call<B, R>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
        timeout: Duration,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.runtime
            .block_on(self.inner.call(method, path, payload, timeout))
    }

    /// See [`crate::BackendClient::ping`].
    pub fn ping(&self) -> Result<(), Error> {
        self.runtime.block_on(self.inner.ping())
    }

    /// See [`crate::BackendClient::get_token`].
    pub fn get_token(&self) -> Result<String, Error> {
        self.runtime.block_on(self.inner.get_token())
    }

    /// See [`crate::BackendClient::policy_query`].
    pub fn policy_query<B: Serialize + ?Sized>(&self, body: &B) -> Result<Payload, Error> {
        self.runtime.block_on(self.inner.policy_query(body))
    }

    /// See [`crate::BackendClient::v2_policy_query`].
    pub fn v2_policy_query<B: Serialize + ?Sized>(
        &self,
        system: &str,
        body: &B,
    ) -> Result<Payload, Error> {
        self.runtime.block_on(self.inner.v2_policy_query(system, body))
    }

    /// See [`crate::BackendClient::policy_query_by_actions`].
    pub fn policy_query_by_actions<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<Vec<Payload>, Error> {
        self.runtime
            .block_on(self.inner.policy_query_by_actions(body))
    }

    /// See [`crate::BackendClient::v2_policy_query_by_actions`].
    pub fn v2_policy_query_by_actions<B: Serialize + ?Sized>(
        &self,
        system: &str,
        body: &B,
    ) -> Result<Vec<Payload>, Error> {
        self.runtime
            .block_on(self.inner.v2_policy_query_by_actions(system, body))
    }

    /// See [`crate::BackendClient::policy_auth`].
    pub fn policy_auth<B: Serialize + ?Sized>(&self, body: &B) -> Result<Payload, Error> {
        self.runtime.block_on(self.inner.policy_auth(body))
    }

    /// See [`crate::BackendClient::v2_policy_auth`].
    pub fn v2_policy_auth<B: Serialize + ?Sized>(
        &self,
        system: &str,
        body: &B,
    ) -> Result<Payload, Error> {
        self.runtime.block_on(self.inner.v2_policy_auth(system, body))
    }

    /// See [`crate::BackendClient::policy_auth_by_resources`].
    pub fn policy_auth_by_resources<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<Payload, Error> {
        self.runtime
            .block_on(self.inner.policy_auth_by_resources(body))
    }

    /// See [`crate::BackendClient::policy_auth_by_actions`].
    pub fn policy_auth_by_actions<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<Payload, Error> {
        self.runtime
            .block_on(self.inner.policy_auth_by_actions(body))
    }

    /// See [`crate::BackendClient::policy_get`].
    pub fn policy_get(&self, policy_id: i64) -> Result<Payload, Error> {
        self.runtime.block_on(self.inner.policy_get(policy_id))
    }

    /// See [`crate::BackendClient::policy_list`].
    pub fn policy_list<B: Serialize + ?Sized>(&self, query: &B) -> Result<Payload, Error> {
        self.runtime.block_on(self.inner.policy_list(query))
    }

    /// See [`crate::BackendClient::policy_subjects`].
    pub fn policy_subjects(&self, policy_ids: &[i64]) -> Result<Vec<Payload>, Error> {
        self.runtime.block_on(self.inner.policy_subjects(policy_ids))
    }

    /// See [`crate::BackendClient::get_apply_url`].
    pub fn get_apply_url<B: Serialize + ?Sized>(&self, body: &B) -> Result<String, Error> {
        self.runtime.block_on(self.inner.get_apply_url(body))
    }
}
