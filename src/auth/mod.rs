//! Application credentials and how they are attached to requests.
//!
//! - [`AppCredentials`]: the application code / secret pair
//! - [`CredentialAttacher`]: adds credential headers to a request
//! - [`GatewayAuth`]: single `X-Bkapi-Authorization` JSON header
//! - [`DirectAuth`]: separate `X-BK-APP-CODE` / `X-BK-APP-SECRET` headers

mod attacher;
mod credentials;

pub(crate) use attacher::attacher_for;
pub use attacher::{
    APP_CODE_HEADER, APP_SECRET_HEADER, CredentialAttacher, DirectAuth, GATEWAY_AUTH_HEADER,
    GatewayAuth,
};
pub use credentials::AppCredentials;
