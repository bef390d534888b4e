//! Core types shared by the client, the dispatcher and the test doubles.
//!
//! - [`Payload`]: the schema-less mapping most endpoints return
//! - [`Method`]: HTTP methods used by the backend API
//! - [`Endpoint`]: the catalogue of backend operations

mod endpoint;
mod payload;

pub use endpoint::{Endpoint, Method};
pub use payload::{Payload, join_ids, payload_str};
