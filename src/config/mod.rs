//! Configuration types for the IAM backend SDK.
//!
//! - [`ClientConfig`]: host, mode, system and credentials of a client
//! - [`ApiFlags`]: debug / force passthrough flags

mod flags;

use std::time::Duration;

pub use flags::{ApiFlags, DEBUG_ENV_VARS, FORCE_ENV_VARS};

use crate::auth::AppCredentials;

/// Timeout used when a call passes `Duration::ZERO`, and by `ping`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout used by every endpoint method.
pub const ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable configuration of a [`BackendClient`](crate::BackendClient).
///
/// ## Example
///
/// ```rust
/// use iam_backend::{ApiFlags, AppCredentials, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .host("http://iam.example.com/")
///     .system("demo")
///     .credentials(AppCredentials::new("bk_demo", "secret"))
///     .gateway(true)
///     .flags(ApiFlags::from_env())
///     .build();
///
/// assert_eq!(config.base_url(), "http://iam.example.com");
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct ClientConfig {
    /// Backend host URL, e.g. `http://iam.example.com`.
    #[builder(into)]
    pub host: String,

    /// System identifier used by the v1 system-scoped endpoints.
    #[builder(into)]
    pub system: String,

    /// Application credentials.
    pub credentials: AppCredentials,

    /// Send credentials in API gateway form.
    #[builder(default = false)]
    pub gateway: bool,

    /// Debug / force passthrough flags. Read from the process environment
    /// when the configuration is built unless set explicitly.
    #[builder(default = ApiFlags::from_env())]
    pub flags: ApiFlags,

    /// Timeout applied when a call asks for `Duration::ZERO`.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub default_timeout: Duration,
}

impl ClientConfig {
    /// Returns the host with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.host.trim_end_matches('/')
    }
}
