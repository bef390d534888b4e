//! Credential header attachment.
//!
//! The IAM backend accepts application credentials in two shapes, depending
//! on whether requests pass through the API gateway. Each shape is a
//! [`CredentialAttacher`]; the client picks one when it is constructed and
//! never branches on the mode afterwards.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use zeroize::Zeroizing;

use super::AppCredentials;
use crate::Error;

/// Gateway credential header, carrying a JSON object.
pub const GATEWAY_AUTH_HEADER: &str = "X-Bkapi-Authorization";

/// Direct-mode application code header.
pub const APP_CODE_HEADER: &str = "X-BK-APP-CODE";

/// Direct-mode application secret header.
pub const APP_SECRET_HEADER: &str = "X-BK-APP-SECRET";

/// Adds application credentials to an outgoing request's headers.
pub trait CredentialAttacher: Send + Sync {
    /// Inserts the credential headers into `headers`.
    fn attach(&self, headers: &mut HeaderMap);

    /// Short name of the mode, used in logs.
    fn mode(&self) -> &'static str;
}

/// Gateway mode: one `X-Bkapi-Authorization` header whose value is
/// `{"bk_app_code": ..., "bk_app_secret": ...}`.
#[derive(Clone)]
pub struct GatewayAuth {
    value: HeaderValue,
}

#[derive(Serialize)]
struct GatewayAuthorization<'a> {
    bk_app_code: &'a str,
    bk_app_secret: &'a str,
}

impl GatewayAuth {
    /// Encodes the credentials into the gateway header value.
    pub fn new(credentials: &AppCredentials) -> Result<Self, Error> {
        let json: Zeroizing<String> = serde_json::to_string(&GatewayAuthorization {
            bk_app_code: credentials.app_code(),
            bk_app_secret: credentials.app_secret(),
        })
        .map(Zeroizing::new)
        .map_err(|e| {
            Error::configuration(format!("generate apigateway call header fail: {}", e))
                .with_source(e)
        })?;

        Ok(Self {
            value: sensitive_value(json.as_bytes(), GATEWAY_AUTH_HEADER)?,
        })
    }
}

impl CredentialAttacher for GatewayAuth {
    fn attach(&self, headers: &mut HeaderMap) {
        headers.insert(
            HeaderName::from_static("x-bkapi-authorization"),
            self.value.clone(),
        );
    }

    fn mode(&self) -> &'static str {
        "gateway"
    }
}

/// Direct mode: the code and secret as two separate headers.
#[derive(Clone)]
pub struct DirectAuth {
    app_code: HeaderValue,
    app_secret: HeaderValue,
}

impl DirectAuth {
    /// Validates the credentials as header values.
    pub fn new(credentials: &AppCredentials) -> Result<Self, Error> {
        let app_code = HeaderValue::from_bytes(credentials.app_code().as_bytes()).map_err(|e| {
            Error::configuration(format!("invalid {} header value: {}", APP_CODE_HEADER, e))
        })?;

        Ok(Self {
            app_code,
            app_secret: sensitive_value(credentials.app_secret().as_bytes(), APP_SECRET_HEADER)?,
        })
    }
}

impl CredentialAttacher for DirectAuth {
    fn attach(&self, headers: &mut HeaderMap) {
        headers.insert(
            HeaderName::from_static("x-bk-app-code"),
            self.app_code.clone(),
        );
        headers.insert(
            HeaderName::from_static("x-bk-app-secret"),
            self.app_secret.clone(),
        );
    }

    fn mode(&self) -> &'static str {
        "direct"
    }
}

/// Selects the attacher for the configured mode.
pub(crate) fn attacher_for(
    credentials: &AppCredentials,
    gateway: bool,
) -> Result<Arc<dyn CredentialAttacher>, Error> {
    if gateway {
        Ok(Arc::new(GatewayAuth::new(credentials)?))
    } else {
        Ok(Arc::new(DirectAuth::new(credentials)?))
    }
}

fn sensitive_value(bytes: &[u8], header: &str) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_bytes(bytes).map_err(|e| {
        Error::configuration(format!("invalid {} header value: {}", header, e))
    })?;
    value.set_sensitive(true);
    Ok(value)
}
