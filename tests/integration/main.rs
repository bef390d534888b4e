//! Integration tests for the IAM backend Rust SDK.
//!
//! Each test drives the public API against a local `wiremock` server that
//! plays the IAM backend, so no deployment is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With request logs
//! RUST_LOG=iam_backend=debug cargo test --test integration -- --nocapture
//! ```

mod client_tests;
mod common;
mod transport_tests;
