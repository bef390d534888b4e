//! HTTP transport for the IAM backend.
//!
//! Every backend response is an [`Envelope`]. The dispatcher attaches the
//! protocol version and credential headers, sends the request with the
//! per-call timeout, and turns the response into either the decoded `data`
//! or an [`Error`](crate::Error):
//!
//! | Response                          | Result                         |
//! |-----------------------------------|--------------------------------|
//! | no response                       | `Connection` / `Timeout` / `Transport` |
//! | status != 200                     | `HttpStatus` (+ envelope code/message) |
//! | 200, body not an envelope         | `InvalidResponse`              |
//! | 200, `code != 0`                  | `Application`                  |
//! | 200, `code == 0`, `data` mismatch | `InvalidResponse`              |
//! | 200, `code == 0`                  | `Ok(data)`                     |

mod dispatcher;
mod envelope;

pub(crate) use dispatcher::Dispatcher;
pub use dispatcher::{IAM_VERSION, IAM_VERSION_HEADER};
pub use envelope::Envelope;
