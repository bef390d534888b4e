//! Testing utilities for code that uses the IAM backend client.
//!
//! - [`MockBackend`]: an in-process [`IamBackend`](crate::IamBackend) with
//!   canned responses and a call log
//!
//! Code written against `&dyn IamBackend` runs unchanged on a
//! [`BackendClient`](crate::BackendClient) or a `MockBackend`. To exercise
//! the HTTP layer itself, point a real client at a `wiremock` server.
//!
//! ## Quick Start
//!
//! ```rust
//! use iam_backend::testing::MockBackend;
//! use iam_backend::{Endpoint, IamBackend};
//! use serde_json::json;
//!
//! let mock = MockBackend::new().with_data(Endpoint::PolicyAuth, json!({"allowed": true}));
//!
//! async fn allowed(backend: &dyn IamBackend) -> bool {
//!     let data = backend.policy_auth(&json!({"system": "demo"})).await.unwrap();
//!     data["allowed"] == json!(true)
//! }
//! ```

mod mock_backend;

pub use mock_backend::{MockBackend, MockCall};
