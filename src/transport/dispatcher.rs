//! Authenticated request dispatch using reqwest.
//!
//! One call is: build the URL, attach the version and credential headers,
//! send, validate the envelope and decode `data`. Nothing is retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use super::Envelope;
use crate::auth::{CredentialAttacher, attacher_for};
use crate::config::{ApiFlags, ClientConfig};
use crate::metrics::{MetricsCallback, RequestRecord, SERVICE_NAME};
use crate::types::{Endpoint, Method};
use crate::{Error, ErrorKind, user_agent};

/// Protocol version header attached to every request.
pub const IAM_VERSION_HEADER: &str = "X-Bk-IAM-Version";

/// Value of [`IAM_VERSION_HEADER`].
pub const IAM_VERSION: &str = "1";

/// Sends requests to the backend and unwraps their envelopes.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    http: reqwest::Client,
    base_url: String,
    attacher: Arc<dyn CredentialAttacher>,
    flags: ApiFlags,
    default_timeout: Duration,
    metrics: Option<Arc<dyn MetricsCallback>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("auth_mode", &self.attacher.mode())
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Validates the configuration and builds the HTTP client.
    pub(crate) fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = config.base_url().to_string();
        Url::parse(&base_url)?;

        let attacher = attacher_for(&config.credentials, config.gateway)?;

        let http = reqwest::Client::builder()
            .user_agent(user_agent::user_agent(config))
            .build()
            .map_err(|e| {
                Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;

        Ok(Self {
            http,
            base_url,
            attacher,
            flags: config.flags,
            default_timeout: config.default_timeout,
            metrics: None,
        })
    }

    pub(crate) fn set_metrics(&mut self, metrics: Arc<dyn MetricsCallback>) {
        self.metrics = Some(metrics);
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the host and path by plain concatenation, so a host with a
    /// path prefix keeps it.
    fn build_url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-bk-iam-version"),
            HeaderValue::from_static(IAM_VERSION),
        );
        self.attacher.attach(&mut headers);
        headers
    }

    /// Substitutes the configured default for a zero timeout.
    fn resolve_timeout(&self, timeout: Duration) -> Duration {
        if timeout.is_zero() {
            self.default_timeout
        } else {
            timeout
        }
    }

    /// Sends one request on behalf of `endpoint`, using its method.
    pub(crate) async fn call_endpoint<B, R>(
        &self,
        endpoint: Endpoint,
        path: &str,
        payload: &B,
        timeout: Duration,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.dispatch(Some(endpoint), endpoint.method(), path, payload, timeout)
            .await
    }

    /// Sends one request and decodes the envelope's `data` into `R`.
    ///
    /// GET payloads become the query string, POST payloads the JSON body.
    /// A zero `timeout` uses the configured default.
    pub(crate) async fn call<B, R>(
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
        self.dispatch(None, method, path, payload, timeout).await
    }

    async fn dispatch<B, R>(
        &self,
        endpoint: Option<Endpoint>,
        method: Method,
        path: &str,
        payload: &B,
        timeout: Duration,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(path)?;
        let timeout = self.resolve_timeout(timeout);

        if tracing::enabled!(tracing::Level::DEBUG) {
            let data = serde_json::to_string(payload).unwrap_or_default();
            tracing::debug!(%method, %url, %data, "do http request");
        }

        let start = Instant::now();
        let (status, result) = self.exchange(method, url.clone(), payload, timeout).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => tracing::debug!(
                %method,
                %url,
                status,
                elapsed_ms = duration.as_millis() as u64,
                "http request succeeded"
            ),
            Err(err) => tracing::warn!(
                %method,
                %url,
                status,
                elapsed_ms = duration.as_millis() as u64,
                error = %err,
                "http request failed"
            ),
        }

        if let Some(metrics) = &self.metrics {
            metrics.on_request(&RequestRecord {
                service: SERVICE_NAME,
                endpoint,
                method,
                path: path.to_string(),
                status,
                duration,
                error: result.as_ref().err().map(Error::kind),
            });
        }

        result
    }

    async fn exchange<B, R>(
        &self,
        method: Method,
        url: Url,
        payload: &B,
        timeout: Duration,
    ) -> (Option<u16>, Result<R, Error>)
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self
            .http
            .request(method.into(), url)
            .headers(self.build_headers())
            .timeout(timeout);

        let request = match method {
            Method::Get => request.query(payload),
            Method::Post => request.json(payload),
        };
        let request = request.query(&self.flags.query_pairs());

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                let context = match method {
                    Method::Get => "encode payload as query string fail",
                    Method::Post => "encode payload as json body fail",
                };
                return (None, Err(Error::from(e).with_context(context)));
            }
            Err(e) => return (None, Err(e.into())),
        };

        let status = response.status();
        (Some(status.as_u16()), handle_response(status, response).await)
    }

    /// Checks that the backend answers `GET /ping` with 200.
    ///
    /// No credentials, flags or envelope handling are involved; the body is
    /// ignored.
    pub(crate) async fn ping(&self) -> Result<(), Error> {
        let url = self.build_url("/ping")?;
        tracing::debug!(%url, "ping");

        let response = self
            .http
            .get(url)
            .timeout(self.default_timeout)
            .send()
            .await
            .map_err(|e| {
                let err = Error::from(e);
                Error::new(err.kind(), format!("ping fail! {}", err.message()))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "ping failed");
            return Err(Error::new(
                ErrorKind::HttpStatus,
                format!("ping fail! status_code={}", status.as_u16()),
            )
            .with_status(status.as_u16()));
        }
        Ok(())
    }
}

/// Turns a response into the decoded payload or the matching error.
async fn handle_response<R>(status: StatusCode, response: reqwest::Response) -> Result<R, Error>
where
    R: DeserializeOwned,
{
    let body = response.bytes().await?;

    if status != StatusCode::OK {
        let envelope = serde_json::from_slice::<Envelope>(&body).ok();
        return Err(Error::http_status(
            status.as_u16(),
            envelope.as_ref().map(|e| (e.code, e.message.as_str())),
        ));
    }

    let envelope: Envelope = serde_json::from_slice(&body).map_err(|e| {
        Error::new(
            ErrorKind::InvalidResponse,
            format!(
                "response body is not a valid envelope: {}, body=`{}`",
                e,
                String::from_utf8_lossy(&body)
            ),
        )
        .with_status(status.as_u16())
        .with_source(e)
    })?;

    tracing::debug!(
        code = envelope.code,
        message = %envelope.message,
        "http request result"
    );

    envelope.decode()
}
