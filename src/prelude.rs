//! Prelude module for convenient imports.
//!
//! ```rust
//! use iam_backend::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client and its trait
//! - Configuration and credentials
//! - Error types
//! - Payload helpers

pub use crate::{
    auth::AppCredentials,
    client::{BackendClient, IamBackend},
    config::{ApiFlags, ClientConfig},
    error::{Error, ErrorKind, Result},
    metrics::{Metrics, MetricsCallback},
    testing::MockBackend,
    types::{Endpoint, Method, Payload, join_ids, payload_str},
};
