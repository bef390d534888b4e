//! Error types for the IAM backend SDK.
//!
//! Every operation returns [`Result<T>`], whose error side is a single
//! [`Error`] categorized by [`ErrorKind`]:
//!
//! - transport failures: [`ErrorKind::Connection`], [`ErrorKind::Timeout`],
//!   [`ErrorKind::Transport`]
//! - HTTP status other than 200: [`ErrorKind::HttpStatus`]
//! - non-zero envelope code: [`ErrorKind::Application`]
//! - payload shape mismatch: [`ErrorKind::InvalidResponse`]
//! - field extraction: [`ErrorKind::MissingField`], [`ErrorKind::InvalidField`]
//!
//! Errors are never retried or suppressed by the SDK.

mod base;
mod kind;

pub use base::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for IAM backend operations.
pub type Result<T> = std::result::Result<T, Error>;
