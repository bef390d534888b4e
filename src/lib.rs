//! # IAM Backend Rust SDK
//!
//! Client for the IAM permission backend: policy queries, authorization
//! decisions, policy listing and permission application URLs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use iam_backend::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> iam_backend::error::Result<()> {
//!     let client = BackendClient::new(
//!         ClientConfig::builder()
//!             .host("http://iam.example.com")
//!             .system("demo")
//!             .credentials(AppCredentials::new("bk_demo", "secret"))
//!             .gateway(true)
//!             .build(),
//!     )?;
//!
//!     let decision = client
//!         .policy_auth(&json!({
//!             "system": "demo",
//!             "subject": {"type": "user", "id": "admin"},
//!             "action": {"id": "view"},
//!             "resources": [],
//!         }))
//!         .await?;
//!     println!("allowed: {}", decision["allowed"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Envelope**: every response is `{code, message, data}`; a non-zero
//!   `code` is an [`ErrorKind::Application`] error, never a value
//! - **Schema-less data**: endpoints return [`Payload`] maps, or use
//!   [`BackendClient::call`] with a typed result
//! - **Credential modes**: gateway mode sends one JSON header, direct mode
//!   sends the code and secret separately
//! - **No retries**: one call is one HTTP exchange
//!
//! ## Features
//!
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)
//! - `blocking`: Enable the blocking API

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Transport layer
pub mod transport;

// Request observation
pub mod metrics;

// Testing utilities
pub mod testing;

// Blocking API
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub mod blocking;

mod user_agent;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use client::{BackendClient, BackendFuture, IamBackend};
pub use error::{Error, ErrorKind};
pub use types::{Endpoint, Method, Payload, join_ids, payload_str};

// Re-export auth types
pub use auth::AppCredentials;

// Re-export config types
pub use config::{ApiFlags, ClientConfig, DEFAULT_TIMEOUT, ENDPOINT_TIMEOUT};
