//! The IAM backend client.
//!
//! [`BackendClient`] owns the configuration and the HTTP dispatcher. Its
//! endpoint methods each fix a method and a path, send one request, and
//! return the decoded `data`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use iam_backend::prelude::*;
//!
//! let client = BackendClient::new(
//!     ClientConfig::builder()
//!         .host("http://iam.example.com")
//!         .system("demo")
//!         .credentials(AppCredentials::new("bk_demo", "secret"))
//!         .build(),
//! )?;
//!
//! client.ping().await?;
//! let token = client.get_token().await?;
//! ```

mod backend;
mod endpoints;

pub use backend::{BackendFuture, IamBackend};

use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::Error;
use crate::config::ClientConfig;
use crate::metrics::MetricsCallback;
use crate::transport::Dispatcher;
use crate::types::Method;

/// Client for the IAM backend.
///
/// ## Thread Safety
///
/// `BackendClient` is `Clone` and thread-safe. Clones share the same
/// configuration and connection pool; no state changes after construction.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("host", &self.inner.dispatcher.base_url())
            .field("system", &self.inner.config.system)
            .field("gateway", &self.inner.config.gateway)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Creates a client from its configuration.
    ///
    /// Fails with [`ErrorKind::Configuration`](crate::ErrorKind::Configuration)
    /// if the host is not a valid URL or the credentials cannot be sent as
    /// header values.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let dispatcher = Dispatcher::new(&config)?;
        tracing::debug!(
            host = config.base_url(),
            system = %config.system,
            gateway = config.gateway,
            debug = config.flags.debug,
            force = config.flags.force,
            "iam backend client created"
        );
        Ok(Self {
            inner: Arc::new(ClientInner { config, dispatcher }),
        })
    }

    /// Returns a client that reports every request to `metrics`.
    #[must_use]
    pub fn with_metrics(self, metrics: Arc<dyn MetricsCallback>) -> Self {
        let mut dispatcher = self.inner.dispatcher.clone();
        dispatcher.set_metrics(metrics);
        Self {
            inner: Arc::new(ClientInner {
                config: self.inner.config.clone(),
                dispatcher,
            }),
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the configured system identifier.
    pub fn system(&self) -> &str {
        &self.inner.config.system
    }

    /// Sends an arbitrary request and decodes the envelope's `data` into `R`.
    ///
    /// GET payloads are sent as the query string, POST payloads as the JSON
    /// body. `Duration::ZERO` selects the configured default timeout.
    ///
    /// ```rust,ignore
    /// #[derive(serde::Deserialize)]
    /// struct Token { token: String }
    ///
    /// let token: Token = client
    ///     .call(Method::Get, "/api/v1/model/systems/demo/token", &Payload::new(), Duration::ZERO)
    ///     .await?;
    /// ```
    pub async fn call<B, R>(
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
        self.inner
            .dispatcher
            .call(method, path, payload, timeout)
            .await
    }
}
