//! Schema-less response payloads.

use serde_json::{Map, Value};

use crate::Error;

/// A decoded `data` object.
///
/// The backend's payloads are not described by a schema the client can rely
/// on, so they are kept as JSON maps. Callers that know the shape can use
/// [`BackendClient::call`](crate::BackendClient::call) with their own type.
pub type Payload = Map<String, Value>;

/// Returns the string value of `field`.
///
/// Fails with [`ErrorKind::MissingField`](crate::ErrorKind::MissingField)
/// when the field is absent and
/// [`ErrorKind::InvalidField`](crate::ErrorKind::InvalidField) when it is not
/// a string.
///
/// ```rust
/// use iam_backend::{payload_str, ErrorKind, Payload};
///
/// let payload: Payload = serde_json::from_str(r#"{"token": "abc", "ttl": 60}"#).unwrap();
/// assert_eq!(payload_str(&payload, "token").unwrap(), "abc");
/// assert_eq!(payload_str(&payload, "ttl").unwrap_err().kind(), ErrorKind::InvalidField);
/// assert_eq!(payload_str(&payload, "url").unwrap_err().kind(), ErrorKind::MissingField);
/// ```
pub fn payload_str<'a>(payload: &'a Payload, field: &str) -> Result<&'a str, Error> {
    payload
        .get(field)
        .ok_or_else(|| Error::missing_field(field))?
        .as_str()
        .ok_or_else(|| Error::invalid_field(field))
}

/// Joins policy ids with commas, the list encoding the backend expects in
/// query strings.
///
/// ```rust
/// assert_eq!(iam_backend::join_ids(&[1, 2, 3]), "1,2,3");
/// ```
pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
