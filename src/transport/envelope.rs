//! The `{code, message, data}` wrapper every backend response uses.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, ErrorKind};

/// Uniform response wrapper of the IAM backend.
///
/// `code == 0` signals success; any other value is an application-level
/// failure described by `message`. `data` is opaque until the envelope has
/// been validated. A `data` key holding `null` is `Some(Value::Null)`; a
/// missing key is `None`.
///
/// ```rust
/// use iam_backend::transport::Envelope;
///
/// let envelope: Envelope =
///     serde_json::from_str(r#"{"code": 0, "message": "ok", "data": {"token": "abc"}}"#).unwrap();
/// assert!(envelope.is_success());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Application status code, `0` on success.
    #[serde(default)]
    pub code: i64,

    /// Human-readable status message.
    #[serde(default)]
    pub message: String,

    /// Operation payload.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
}

impl Envelope {
    /// Returns `true` if `code` is zero.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Fails with [`ErrorKind::Application`] when `code` is non-zero.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::application(self.code, &self.message))
        }
    }

    /// Validates the envelope and decodes `data` into `R`.
    ///
    /// A missing `data` key or a shape mismatch fails with
    /// [`ErrorKind::InvalidResponse`]; the mismatch message carries the raw
    /// `data`.
    pub fn decode<R>(&self) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        self.check()?;
        let data = self.data.as_ref().ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse, "response body has no data")
        })?;
        R::deserialize(data).map_err(|e| {
            Error::new(
                ErrorKind::InvalidResponse,
                format!("response body data not valid: {}, data=`{}`", e, data),
            )
            .with_source(e)
        })
    }
}

// Keeps an explicit `null` distinct from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
